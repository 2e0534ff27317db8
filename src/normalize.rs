use crate::dates;
use crate::errors::NormalizeError;
use crate::models::ClientRecord;
use serde_json::Value;
use tracing::warn;

// Sheet column layout: A=name, B=bike, C=tariff/payment amount, D=comment,
// E=debt. Row 0 is the header, row 1 the client's attribute row, rows 1..N
// double as the payment history (column A date, column C amount).
const COL_DATE: usize = 0;
const COL_NAME: usize = 0;
const COL_BIKE: usize = 1;
const COL_AMOUNT: usize = 2;
const COL_TARIFF: usize = 2;
const COL_COMMENT: usize = 3;
const COL_DEBT: usize = 4;

/// Derives the canonical client record from whichever of the three raw
/// response shapes the proxy handed back. Shape detection is by key
/// presence, in fixed priority: Apps Script payload, then raw `values`,
/// then a gviz `table`.
///
/// Pure over its input; the only side effect is a warning when a payment
/// date fails to parse.
pub fn normalize(raw: &Value) -> Result<ClientRecord, NormalizeError> {
    if is_truthy(raw.get("success")) && raw.get("data").is_some_and(|data| !data.is_null()) {
        return Ok(from_named_fields(&raw["data"]));
    }
    if let Some(values) = raw.get("values").and_then(Value::as_array) {
        let rows: Vec<Vec<Value>> = values
            .iter()
            .map(|row| row.as_array().cloned().unwrap_or_default())
            .collect();
        return from_rows(&rows);
    }
    if let Some(rows) = raw.pointer("/table/rows").and_then(Value::as_array) {
        let rows: Vec<Vec<Value>> = rows.iter().map(flatten_table_row).collect();
        return from_rows(&rows);
    }

    Err(NormalizeError::UnknownShape)
}

/// Positional extraction shared by the `values` and `table` shapes.
fn from_rows(rows: &[Vec<Value>]) -> Result<ClientRecord, NormalizeError> {
    if rows.len() < 2 {
        return Err(NormalizeError::InsufficientData);
    }

    let attributes = &rows[1];
    let mut record = ClientRecord::default();
    if let Some(name) = cell_text(attributes, COL_NAME) {
        record.name = name;
    }
    if let Some(bike) = cell_text(attributes, COL_BIKE) {
        record.bike = bike;
    }
    if let Some(tariff) = cell_text(attributes, COL_TARIFF) {
        record.tariff = tariff;
    }
    if let Some(comment) = cell_text(attributes, COL_COMMENT) {
        record.comment = comment;
    }
    record.debt = attributes.get(COL_DEBT).map_or(0.0, coerce_number);

    // The most recent payment is the bottom-most row with a filled amount
    // cell; finding none is not an error.
    for row in rows[1..].iter().rev() {
        if let Some(amount) = cell_text(row, COL_AMOUNT) {
            let raw_date = cell_text(row, COL_DATE);
            apply_last_payment(&mut record, amount, raw_date);
            break;
        }
    }

    Ok(record)
}

/// Extraction for the Apps Script shape, where fields arrive already named.
/// `lastPayment` is either a bare amount or an `{amount, date}` object.
fn from_named_fields(data: &Value) -> ClientRecord {
    let mut record = ClientRecord::default();
    if let Some(name) = display_text(data.get("client")) {
        record.name = name;
    }
    if let Some(bike) = display_text(data.get("bike")) {
        record.bike = bike;
    }
    if let Some(tariff) = display_text(data.get("tariff")) {
        record.tariff = tariff;
    }
    if let Some(comment) = display_text(data.get("comment")) {
        record.comment = comment;
    }
    record.debt = data.get("debt").map_or(0.0, coerce_number);

    let sibling_date = display_text(data.get("lastPaymentDate"));
    match data.get("lastPayment") {
        Some(Value::Object(payment)) => {
            if let Some(amount) = display_text(payment.get("amount")) {
                let raw_date = display_text(payment.get("date")).or(sibling_date);
                apply_last_payment(&mut record, amount, raw_date);
            }
        }
        Some(scalar) => {
            if let Some(amount) = display_text(Some(scalar)) {
                apply_last_payment(&mut record, amount, sibling_date);
            }
        }
        None => {}
    }

    record
}

// A provided nextPayment field is deliberately not read here: the next due
// date is always recomputed as last payment + 7 days.
fn apply_last_payment(record: &mut ClientRecord, amount: String, raw_date: Option<String>) {
    record.last_payment_amount = Some(amount);

    let Some(raw_date) = raw_date else {
        return;
    };
    let payment_dates = dates::parse_date(&raw_date)
        .and_then(|date| Some((date, dates::next_payment_date(date)?)));
    match payment_dates {
        Some((date, next)) => {
            record.last_payment_date = Some(dates::format_date(date));
            record.next_payment_date = Some(dates::format_date(next));
        }
        None => {
            warn!("unusable payment date {raw_date:?}, leaving payment dates unset");
        }
    }
}

fn flatten_table_row(row: &Value) -> Vec<Value> {
    let Some(cells) = row.get("c").and_then(Value::as_array) else {
        return Vec::new();
    };
    cells
        .iter()
        .map(|cell| {
            let value = cell.get("v").filter(|v| !v.is_null());
            let formatted = cell.get("f").filter(|f| !f.is_null());
            value.or(formatted).cloned().unwrap_or(Value::Null)
        })
        .collect()
}

fn cell_text(row: &[Value], index: usize) -> Option<String> {
    display_text(row.get(index))
}

/// Cells hold strings or numbers; both become their trimmed display form.
/// Empty and null cells count as absent.
fn display_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().replace(',', ".").parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(_) => true,
    }
}
