//! CSV export for expenses and debt projections

use std::io::Write;

use serde::Serialize;

use crate::debt::DebtProjection;
use crate::error::{Error, Result};
use crate::models::Expense;

#[derive(Serialize)]
struct ExpenseRow<'a> {
    date: String,
    category: &'a str,
    amount: String,
    currency: &'a str,
    description: &'a str,
    recurring: bool,
}

#[derive(Serialize)]
struct ProjectionRow {
    month: u32,
    date: String,
    payment: String,
    interest: String,
    principal: String,
    balance: String,
}

/// Write expenses as CSV, returning the number of rows written
pub fn write_expenses_csv<W: Write>(writer: W, expenses: &[Expense]) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);

    if expenses.is_empty() {
        csv.write_record(["date", "category", "amount", "currency", "description", "recurring"])?;
    }
    for e in expenses {
        csv.serialize(ExpenseRow {
            date: e.date.to_string(),
            category: &e.category,
            amount: format!("{:.2}", e.amount),
            currency: &e.currency,
            description: e.description.as_deref().unwrap_or(""),
            recurring: e.recurring_id.is_some(),
        })?;
    }

    csv.flush()?;
    Ok(expenses.len())
}

/// Write a payoff schedule as CSV, returning the number of rows written
pub fn write_projection_csv<W: Write>(writer: W, projection: &DebtProjection) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);

    if projection.points.is_empty() {
        csv.write_record(["month", "date", "payment", "interest", "principal", "balance"])?;
    }
    for p in &projection.points {
        csv.serialize(ProjectionRow {
            month: p.month,
            date: p.date.to_string(),
            payment: format!("{:.2}", p.payment),
            interest: format!("{:.2}", p.interest),
            principal: format!("{:.2}", p.principal),
            balance: format!("{:.2}", p.balance),
        })?;
    }

    csv.flush()?;
    Ok(projection.points.len())
}

/// Expenses CSV as an in-memory string
pub fn expenses_csv_string(expenses: &[Expense]) -> Result<String> {
    let mut buf = Vec::new();
    write_expenses_csv(&mut buf, expenses)?;
    String::from_utf8(buf).map_err(|e| Error::InvalidData(format!("CSV output is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debt::Projector;
    use crate::models::{Debt, DebtType};
    use chrono::{NaiveDate, Utc};

    fn expense(category: &str, amount: f64, description: Option<&str>) -> Expense {
        Expense {
            id: 1,
            category: category.to_string(),
            amount,
            currency: "USD".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
            description: description.map(String::from),
            recurring_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_expenses_csv_quotes_fields() {
        let out = expenses_csv_string(&[
            expense("Dining", 42.5, Some("Pizza, wings")),
            expense("Groceries", -3.0, None),
        ])
        .unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "date,category,amount,currency,description,recurring");
        assert_eq!(lines[1], "2026-03-04,Dining,42.50,USD,\"Pizza, wings\",false");
        assert_eq!(lines[2], "2026-03-04,Groceries,-3.00,USD,,false");
    }

    #[test]
    fn test_empty_exports_still_have_header() {
        assert_eq!(
            expenses_csv_string(&[]).unwrap().trim(),
            "date,category,amount,currency,description,recurring"
        );
    }

    #[test]
    fn test_projection_csv_to_file() {
        let debt = Debt {
            id: 1,
            name: "Loan".to_string(),
            debt_type: DebtType::PersonalLoan,
            currency: "USD".to_string(),
            current_balance: 1_200.0,
            interest_rate: 0.0,
            minimum_payment: 100.0,
            created_at: Utc::now(),
        };
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let projection = Projector::default().project(&debt, 0.0, start).unwrap();

        let file = tempfile::NamedTempFile::new().unwrap();
        let rows = write_projection_csv(file.reopen().unwrap(), &projection).unwrap();
        assert_eq!(rows, 12);

        let content = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "month,date,payment,interest,principal,balance");
        assert_eq!(lines[1], "1,2026-02-01,100.00,0.00,100.00,1100.00");
        assert_eq!(lines[12], "12,2027-01-01,100.00,0.00,100.00,0.00");
    }
}
