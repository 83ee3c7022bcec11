//! SQL query construction
//!
//! Builders return SQL text plus positional parameters. Filter values are
//! always bound; the only text spliced into SQL is a column or table name
//! chosen by matching on an enum.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::classify::{Bucket, ONE_MONTH, THREE_MONTHS};
use crate::models::{ReferenceKind, ReferenceRecord, PRIORITY_FLAG};
use crate::stock_position::{PositionInputs, RecomputedPosition};
use crate::types::{DrugCategory, ReferenceBasis, SelectedMetric, StockFilter, STATE_TOTAL};
use crate::upload::{UploadBatch, UploadKind};

/// A bind parameter, in the Postgres type it is sent as
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    BigInt(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    TextArray(Vec<String>),
    NullableTextArray(Vec<Option<String>>),
    BigIntArray(Vec<i64>),
    DecimalArray(Vec<Decimal>),
    NullableDecimalArray(Vec<Option<Decimal>>),
    NullableDateArray(Vec<Option<NaiveDate>>),
}

/// SQL text with `$1..$n` placeholders and their values in order
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

#[derive(Debug, Default)]
struct Binder {
    params: Vec<SqlParam>,
}

impl Binder {
    /// Append a parameter and return its placeholder
    fn bind(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }

    fn finish(self, sql: String) -> SqlQuery {
        SqlQuery {
            sql,
            params: self.params,
        }
    }
}

/// Boolean condition over a row's stock position and quantity.
///
/// The same value renders to SQL and evaluates in Rust, so database filters
/// and in-memory classification cannot drift apart.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    PositionAtMost(Decimal),
    PositionAbove(Decimal),
    QuantityAtMost(i64),
    QuantityAbove(i64),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    /// Condition selecting exactly the rows [`crate::classify`] puts in `bucket`
    pub fn for_bucket(bucket: Bucket) -> Condition {
        use Condition::*;
        match bucket {
            Bucket::ZeroStock => All(vec![QuantityAtMost(0), PositionAtMost(Decimal::ZERO)]),
            Bucket::BelowOneMonth => Any(vec![
                All(vec![PositionAtMost(Decimal::ZERO), QuantityAbove(0)]),
                All(vec![PositionAbove(Decimal::ZERO), PositionAtMost(ONE_MONTH)]),
            ]),
            Bucket::OneToThreeMonths => All(vec![PositionAbove(ONE_MONTH), PositionAtMost(THREE_MONTHS)]),
            Bucket::AboveThreeMonths => PositionAbove(THREE_MONTHS),
        }
    }

    pub fn matches(&self, position: Decimal, quantity: i64) -> bool {
        match self {
            Condition::PositionAtMost(limit) => position <= *limit,
            Condition::PositionAbove(limit) => position > *limit,
            Condition::QuantityAtMost(limit) => quantity <= *limit,
            Condition::QuantityAbove(limit) => quantity > *limit,
            Condition::All(parts) => parts.iter().all(|c| c.matches(position, quantity)),
            Condition::Any(parts) => parts.iter().any(|c| c.matches(position, quantity)),
        }
    }

    fn render(&self, position: &str, quantity: &str, binder: &mut Binder) -> String {
        match self {
            Condition::PositionAtMost(limit) => {
                format!("{position} <= {}::NUMERIC", binder.bind(SqlParam::Decimal(*limit)))
            }
            Condition::PositionAbove(limit) => {
                format!("{position} > {}::NUMERIC", binder.bind(SqlParam::Decimal(*limit)))
            }
            Condition::QuantityAtMost(limit) => {
                format!("{quantity} <= {}::BIGINT", binder.bind(SqlParam::BigInt(*limit)))
            }
            Condition::QuantityAbove(limit) => {
                format!("{quantity} > {}::BIGINT", binder.bind(SqlParam::BigInt(*limit)))
            }
            Condition::All(parts) => join_parts(parts, " AND ", position, quantity, binder),
            Condition::Any(parts) => join_parts(parts, " OR ", position, quantity, binder),
        }
    }
}

fn join_parts(
    parts: &[Condition],
    separator: &str,
    position: &str,
    quantity: &str,
    binder: &mut Binder,
) -> String {
    let rendered: Vec<String> = parts
        .iter()
        .map(|c| c.render(position, quantity, binder))
        .collect();
    format!("({})", rendered.join(separator))
}

fn position_expr(alias: &str, basis: ReferenceBasis) -> String {
    format!("COALESCE({alias}.{}, 0)::NUMERIC", basis.stock_position_column())
}

fn quantity_expr(alias: &str) -> String {
    format!("COALESCE({alias}.stock_quantity, 0)")
}

fn priority_clause(alias: &str, category: DrugCategory, binder: &mut Binder) -> Option<String> {
    match category {
        DrugCategory::All => None,
        DrugCategory::Priority => Some(format!(
            "{alias}.item_code IN (SELECT item_code FROM item_master WHERE priority_item = {})",
            binder.bind(SqlParam::Text(PRIORITY_FLAG.to_string()))
        )),
    }
}

/// Distinct non-empty warehouse names
pub fn warehouse_options() -> SqlQuery {
    Binder::default().finish(
        r#"
        SELECT DISTINCT warehouse_name
        FROM stock_data
        WHERE warehouse_name IS NOT NULL AND TRIM(warehouse_name) <> ''
        ORDER BY warehouse_name
        "#
        .to_string(),
    )
}

/// Position and quantity of every row in scope, for the metric tiles.
///
/// Columns: item_code, warehouse_name, position, quantity.
pub fn stock_positions(filter: &StockFilter) -> SqlQuery {
    let mut binder = Binder::default();
    let mut conditions = vec![format!(
        "a.warehouse_name = {}",
        binder.bind(SqlParam::Text(filter.warehouse.warehouse_name().to_string()))
    )];
    conditions.extend(priority_clause("a", filter.category, &mut binder));

    let sql = format!(
        r#"
        SELECT a.item_code,
               a.warehouse_name,
               {position} AS position,
               {quantity}::BIGINT AS quantity
        FROM stock_data a
        WHERE {conditions}
        ORDER BY a.item_code
        "#,
        position = position_expr("a", filter.basis),
        quantity = quantity_expr("a"),
        conditions = conditions.join(" AND "),
    );
    binder.finish(sql)
}

/// The dashboard stock table, one row per item
pub fn stock_listing(filter: &StockFilter, metric: SelectedMetric) -> SqlQuery {
    let mut binder = Binder::default();
    let position = position_expr("a", filter.basis);
    let quantity = quantity_expr("a");

    let mut conditions = vec![format!(
        "a.warehouse_name = {}",
        binder.bind(SqlParam::Text(filter.warehouse.warehouse_name().to_string()))
    )];
    conditions.extend(priority_clause("a", filter.category, &mut binder));
    if let Some(bucket) = metric.bucket() {
        conditions.push(Condition::for_bucket(bucket).render(&position, &quantity, &mut binder));
    }

    let sql = format!(
        r#"
        SELECT ROW_NUMBER() OVER (ORDER BY a.item_code) AS serial_no,
               a.item_code,
               MAX(im.item_name) AS item_name,
               MAX(im.eml_aml_type) AS eml_aml_type,
               MAX(im.priority_item) AS priority_item,
               MAX(im.type_cons_dem::TEXT) AS type_cons_dem,
               SUM({quantity})::BIGINT AS stock_quantity,
               ROUND(AVG({position}), 2) AS stock_position,
               COALESCE((
                   SELECT SUM(COALESCE(po.po_qty, 0) - COALESCE(po.received_qty, 0))
                   FROM purchase_order_data po
                   WHERE po.item_code = a.item_code
               ), 0)::BIGINT AS pending_supply
        FROM stock_data a
        LEFT JOIN item_master im ON im.item_code = a.item_code
        WHERE {conditions}
        GROUP BY a.item_code
        ORDER BY a.item_code
        "#,
        conditions = conditions.join(" AND "),
    );
    binder.finish(sql)
}

/// Display name of an item, falling back to its code when the name is blank
pub fn item_name(item_code: &str) -> SqlQuery {
    let mut binder = Binder::default();
    let sql = format!(
        "SELECT COALESCE(NULLIF(TRIM(item_name), ''), item_code) FROM item_master WHERE item_code = {} LIMIT 1",
        binder.bind(SqlParam::Text(item_code.to_string()))
    );
    binder.finish(sql)
}

/// Purchase orders for one item, newest first
pub fn purchase_orders_for_item(item_code: &str) -> SqlQuery {
    let mut binder = Binder::default();
    let sql = format!(
        r#"
        SELECT COALESCE(po_number::TEXT, '') AS po_number,
               po_date,
               supplier,
               COALESCE(po_qty, 0)::BIGINT AS po_qty,
               COALESCE(received_qty, 0)::BIGINT AS received_qty,
               supply_status::NUMERIC AS supply_status,
               (COALESCE(po_qty, 0) - COALESCE(received_qty, 0))::BIGINT AS pending_qty,
               scheduled_delivery_date
        FROM purchase_order_data
        WHERE item_code = {}
        ORDER BY po_date DESC NULLS LAST, po_number
        "#,
        binder.bind(SqlParam::Text(item_code.to_string()))
    );
    binder.finish(sql)
}

/// Every real warehouse row (no blanks, no State Total) for the distribution chart.
///
/// Columns match [`stock_positions`].
pub fn warehouse_distribution(basis: ReferenceBasis, category: DrugCategory) -> SqlQuery {
    let mut binder = Binder::default();
    let mut conditions = vec![
        "TRIM(a.warehouse_name) <> ''".to_string(),
        format!(
            "a.warehouse_name <> {}",
            binder.bind(SqlParam::Text(STATE_TOTAL.to_string()))
        ),
    ];
    if category == DrugCategory::Priority {
        conditions.push(format!(
            "im.priority_item = {}",
            binder.bind(SqlParam::Text(PRIORITY_FLAG.to_string()))
        ));
    }

    let sql = format!(
        r#"
        SELECT a.item_code,
               a.warehouse_name,
               {position} AS position,
               {quantity}::BIGINT AS quantity
        FROM stock_data a
        JOIN item_master im ON im.item_code = a.item_code
        WHERE {conditions}
        ORDER BY a.warehouse_name, a.item_code
        "#,
        position = position_expr("a", basis),
        quantity = quantity_expr("a"),
        conditions = conditions.join(" AND "),
    );
    binder.finish(sql)
}

/// Rate contracts ending on or before `cutoff`, earliest first
pub fn expiring_contracts(cutoff: NaiveDate) -> SqlQuery {
    let mut binder = Binder::default();
    let sql = format!(
        r#"
        SELECT rc.item_code,
               im.item_name,
               rc.supplier,
               rc.rate::NUMERIC AS rate,
               rc.contract_from_date,
               rc.contract_to_date
        FROM rate_contract_data rc
        LEFT JOIN item_master im ON im.item_code = rc.item_code
        WHERE rc.contract_to_date IS NOT NULL
          AND rc.contract_to_date <= {}::DATE
        ORDER BY rc.contract_to_date, rc.item_code
        "#,
        binder.bind(SqlParam::Date(cutoff))
    );
    binder.finish(sql)
}

/// State Total items below one month of stock that hold a rate contract still
/// in force on `today` but have nothing left on order
pub fn low_stock_without_pending_supply(basis: ReferenceBasis, today: NaiveDate) -> SqlQuery {
    let mut binder = Binder::default();
    let position = position_expr("a", basis);
    let quantity = quantity_expr("a");

    let warehouse = binder.bind(SqlParam::Text(STATE_TOTAL.to_string()));
    let low = Condition::Any(vec![
        Condition::for_bucket(Bucket::ZeroStock),
        Condition::for_bucket(Bucket::BelowOneMonth),
    ])
    .render(&position, &quantity, &mut binder);
    let active_on = binder.bind(SqlParam::Date(today));

    let sql = format!(
        r#"
        SELECT a.item_code,
               im.item_name,
               {quantity}::BIGINT AS stock_quantity,
               {position} AS stock_position,
               pending.pending_supply
        FROM stock_data a
        LEFT JOIN item_master im ON im.item_code = a.item_code
        CROSS JOIN LATERAL (
            SELECT COALESCE(SUM(COALESCE(po.po_qty, 0) - COALESCE(po.received_qty, 0)), 0)::BIGINT
                       AS pending_supply
            FROM purchase_order_data po
            WHERE po.item_code = a.item_code
        ) pending
        WHERE a.warehouse_name = {warehouse}
          AND {low}
          AND EXISTS (
              SELECT 1 FROM rate_contract_data rc
              WHERE rc.item_code = a.item_code
                AND rc.contract_to_date >= {active_on}::DATE
          )
          AND pending.pending_supply <= 0
        ORDER BY stock_position, a.item_code
        "#,
    );
    binder.finish(sql)
}

/// Inputs for recomputing every stock row's positions
pub fn stock_position_inputs() -> SqlQuery {
    let cons = ReferenceKind::Consumption;
    let dem = ReferenceKind::Demand;
    let sql = format!(
        r#"
        SELECT sd.item_code,
               sd.warehouse_name,
               COALESCE(sd.stock_quantity, 0)::BIGINT AS stock_quantity,
               im.type_cons_dem::TEXT AS type_cons_dem,
               cr.{cons_qty}::BIGINT AS cons_qty_ref,
               dr.{dem_qty}::BIGINT AS dem_qty_ref
        FROM stock_data sd
        LEFT JOIN item_master im ON im.item_code = sd.item_code
        LEFT JOIN {cons_table} cr
               ON cr.item_code = sd.item_code AND cr.warehouse_name = sd.warehouse_name
        LEFT JOIN {dem_table} dr
               ON dr.item_code = sd.item_code AND dr.warehouse_name = sd.warehouse_name
        ORDER BY sd.item_code, sd.warehouse_name
        "#,
        cons_qty = cons.quantity_column(),
        dem_qty = dem.quantity_column(),
        cons_table = cons.table_name(),
        dem_table = dem.table_name(),
    );
    Binder::default().finish(sql)
}

/// Write recomputed positions back in one statement
pub fn update_stock_positions(updates: &[(PositionInputs, RecomputedPosition)]) -> SqlQuery {
    let mut binder = Binder::default();
    let item_codes = binder.bind(SqlParam::TextArray(
        updates.iter().map(|(row, _)| row.item_code.clone()).collect(),
    ));
    let warehouses = binder.bind(SqlParam::TextArray(
        updates.iter().map(|(row, _)| row.warehouse_name.clone()).collect(),
    ));
    let cons = binder.bind(SqlParam::DecimalArray(
        updates.iter().map(|(_, pos)| pos.stock_pos_cons).collect(),
    ));
    let con_dem = binder.bind(SqlParam::NullableDecimalArray(
        updates.iter().map(|(_, pos)| pos.stock_pos_con_dem).collect(),
    ));

    let sql = format!(
        r#"
        UPDATE stock_data sd
        SET stock_pos_cons = u.stock_pos_cons,
            stock_pos_con_dem = u.stock_pos_con_dem
        FROM UNNEST({item_codes}::TEXT[], {warehouses}::TEXT[], {cons}::NUMERIC[], {con_dem}::NUMERIC[])
             AS u(item_code, warehouse_name, stock_pos_cons, stock_pos_con_dem)
        WHERE sd.item_code = u.item_code AND sd.warehouse_name = u.warehouse_name
        "#,
    );
    binder.finish(sql)
}

/// Remove every row of the table an upload kind replaces
pub fn delete_all(kind: UploadKind) -> SqlQuery {
    Binder::default().finish(format!("DELETE FROM {}", kind.table_name()))
}

/// Insert an entire upload in one statement by unnesting column arrays
pub fn bulk_insert(batch: &UploadBatch, entry_date: NaiveDate) -> SqlQuery {
    let mut binder = Binder::default();
    let table = batch.kind().table_name();

    // Scalars are repeated for every unnested row
    let mut scalars: Vec<String> = Vec::new();
    let (columns, arrays): (String, Vec<String>) = match batch {
        UploadBatch::Stock(rows) => (
            "item_code, warehouse_name, stock_quantity".to_string(),
            vec![
                text_column(&mut binder, rows.iter().map(|r| r.item_code.clone())),
                text_column(&mut binder, rows.iter().map(|r| r.warehouse_name.clone())),
                bigint_column(&mut binder, rows.iter().map(|r| r.stock_quantity)),
            ],
        ),
        UploadBatch::PurchaseOrders(rows) => (
            "entry_date, po_number, po_date, item_code, supplier, rate, rate_unit, po_qty, \
             po_value, received_qty, received_value, supply_status, tender_number, \
             scheduled_delivery_date, extended_delivery_period_days"
                .to_string(),
            {
                scalars.push(format!("{}::DATE", binder.bind(SqlParam::Date(entry_date))));
                vec![
                    text_column(&mut binder, rows.iter().map(|r| r.po_number.clone())),
                    date_column(&mut binder, rows.iter().map(|r| r.po_date)),
                    text_column(&mut binder, rows.iter().map(|r| r.item_code.clone())),
                    nullable_text_column(&mut binder, rows.iter().map(|r| r.supplier.clone())),
                    decimal_column(&mut binder, rows.iter().map(|r| r.rate)),
                    nullable_text_column(&mut binder, rows.iter().map(|r| r.rate_unit.clone())),
                    bigint_column(&mut binder, rows.iter().map(|r| r.po_qty)),
                    decimal_column(&mut binder, rows.iter().map(|r| r.po_value)),
                    bigint_column(&mut binder, rows.iter().map(|r| r.received_qty)),
                    decimal_column(&mut binder, rows.iter().map(|r| r.received_value)),
                    decimal_column(&mut binder, rows.iter().map(|r| r.supply_status)),
                    nullable_text_column(&mut binder, rows.iter().map(|r| r.tender_number.clone())),
                    date_column(&mut binder, rows.iter().map(|r| r.scheduled_delivery_date)),
                    bigint_column(&mut binder, rows.iter().map(|r| r.extended_delivery_period_days)),
                ]
            },
        ),
        UploadBatch::RateContracts(rows) => (
            "item_code, supplier, rate, rate_unit, tender_date, contract_from_date, \
             contract_to_date, rate_contract_level"
                .to_string(),
            vec![
                text_column(&mut binder, rows.iter().map(|r| r.item_code.clone())),
                nullable_text_column(&mut binder, rows.iter().map(|r| r.supplier.clone())),
                decimal_column(&mut binder, rows.iter().map(|r| r.rate)),
                nullable_text_column(&mut binder, rows.iter().map(|r| r.rate_unit.clone())),
                date_column(&mut binder, rows.iter().map(|r| r.tender_date)),
                date_column(&mut binder, rows.iter().map(|r| r.contract_from_date)),
                date_column(&mut binder, rows.iter().map(|r| r.contract_to_date)),
                nullable_text_column(&mut binder, rows.iter().map(|r| r.rate_contract_level.clone())),
            ],
        ),
        UploadBatch::ConsumptionReference(rows) => {
            reference_columns(&mut binder, ReferenceKind::Consumption, rows)
        }
        UploadBatch::DemandReference(rows) => {
            reference_columns(&mut binder, ReferenceKind::Demand, rows)
        }
    };

    let aliases: Vec<String> = (1..=arrays.len()).map(|i| format!("c{i}")).collect();
    let mut select_list = scalars;
    select_list.extend(aliases.iter().map(|a| format!("u.{a}")));

    let sql = format!(
        "INSERT INTO {table} ({columns}) SELECT {} FROM UNNEST({}) AS u({})",
        select_list.join(", "),
        arrays.join(", "),
        aliases.join(", "),
    );
    binder.finish(sql)
}

fn reference_columns(
    binder: &mut Binder,
    kind: ReferenceKind,
    rows: &[ReferenceRecord],
) -> (String, Vec<String>) {
    (
        format!("item_code, warehouse_name, {}", kind.quantity_column()),
        vec![
            text_column(binder, rows.iter().map(|r| r.item_code.clone())),
            text_column(binder, rows.iter().map(|r| r.warehouse_name.clone())),
            bigint_column(binder, rows.iter().map(|r| r.reference_qty)),
        ],
    )
}

fn text_column(binder: &mut Binder, values: impl Iterator<Item = String>) -> String {
    format!("{}::TEXT[]", binder.bind(SqlParam::TextArray(values.collect())))
}

fn nullable_text_column(binder: &mut Binder, values: impl Iterator<Item = Option<String>>) -> String {
    format!("{}::TEXT[]", binder.bind(SqlParam::NullableTextArray(values.collect())))
}

fn bigint_column(binder: &mut Binder, values: impl Iterator<Item = i64>) -> String {
    format!("{}::BIGINT[]", binder.bind(SqlParam::BigIntArray(values.collect())))
}

fn decimal_column(binder: &mut Binder, values: impl Iterator<Item = Decimal>) -> String {
    format!("{}::NUMERIC[]", binder.bind(SqlParam::DecimalArray(values.collect())))
}

fn date_column(binder: &mut Binder, values: impl Iterator<Item = Option<NaiveDate>>) -> String {
    format!("{}::DATE[]", binder.bind(SqlParam::NullableDateArray(values.collect())))
}
