//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::{AlertLedger, AlertThreshold, StatusTier};
    use chrono::{TimeZone, Utc};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn new_debt(name: &str, balance: f64, rate: f64, minimum: f64) -> NewDebt {
        NewDebt {
            name: name.to_string(),
            debt_type: DebtType::CreditCard,
            currency: "USD".to_string(),
            current_balance: balance,
            interest_rate: rate,
            minimum_payment: minimum,
        }
    }

    fn new_budget(category: &str, limit: f64) -> NewBudget {
        NewBudget {
            category: category.to_string(),
            monthly_limit: limit,
            currency: "USD".to_string(),
        }
    }

    fn new_expense(category: &str, amount: f64, date: NaiveDate) -> NewExpense {
        NewExpense {
            category: category.to_string(),
            amount,
            currency: "USD".to_string(),
            date,
            description: None,
            recurring_id: None,
        }
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_debts().unwrap().is_empty());
        assert!(db.list_budgets().unwrap().is_empty());
        assert!(!db.is_encrypted().unwrap());
    }

    #[test]
    fn test_schema_tables_exist() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        for table in [
            "debts",
            "budgets",
            "expenses",
            "incomes",
            "recurring_transactions",
            "notifications",
            "budget_alert_log",
            "audit_log",
        ] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {}", table);
        }
    }

    #[test]
    fn test_debt_crud() {
        let db = Database::in_memory().unwrap();

        let visa = db.create_debt(&new_debt("Visa", 5_000.0, 20.0, 100.0)).unwrap();
        db.create_debt(&new_debt("Car", 12_000.0, 6.5, 300.0)).unwrap();

        let debts = db.list_debts().unwrap();
        assert_eq!(debts.len(), 2);
        assert_eq!(debts[0].name, "Car");
        assert_eq!(db.count_debts().unwrap(), 2);

        let fetched = db.get_debt(visa).unwrap().unwrap();
        assert_eq!(fetched.debt_type, DebtType::CreditCard);
        assert_eq!(fetched.interest_rate, 20.0);

        let updated = db.update_debt(visa, &new_debt("Visa", 4_800.0, 19.0, 100.0)).unwrap();
        assert_eq!(updated.current_balance, 4_800.0);

        db.delete_debt(visa).unwrap();
        assert!(db.get_debt(visa).unwrap().is_none());
        assert!(matches!(db.delete_debt(visa), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_debt_validation() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(
            db.create_debt(&new_debt("Bad", -1.0, 5.0, 10.0)),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            db.create_debt(&new_debt("", 100.0, 5.0, 10.0)),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            db.create_debt(&new_debt("Loan shark", 100.0, 1e300, 10.0)),
            Err(Error::InvalidData(_))
        ));
        assert!(db.create_debt(&new_debt("Payday", 100.0, 1_000.0, 10.0)).is_ok());
        assert!(matches!(
            db.update_debt(999, &new_debt("Ghost", 100.0, 5.0, 10.0)),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_paying_off_debt_creates_milestone() {
        let db = Database::in_memory().unwrap();
        let id = db.create_debt(&new_debt("Store card", 300.0, 24.0, 25.0)).unwrap();

        db.update_debt(id, &new_debt("Store card", 0.0, 24.0, 25.0)).unwrap();

        let notifications = db.list_notifications(false, 10).unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].notification_type, NotificationType::DebtMilestone);
        assert_eq!(notifications[0].related_id, Some(id));

        // Already at zero: no second milestone
        db.update_debt(id, &new_debt("Store card", 0.0, 24.0, 25.0)).unwrap();
        assert_eq!(db.count_unread_notifications().unwrap(), 1);
    }

    #[test]
    fn test_budget_crud() {
        let db = Database::in_memory().unwrap();
        let id = db.create_budget(&new_budget("Groceries", 600.0)).unwrap();

        let budget = db.get_budget(id).unwrap().unwrap();
        assert_eq!(budget.category, "Groceries");
        assert_eq!(budget.period, BudgetPeriod::Monthly);

        let updated = db.update_budget(id, &new_budget("Groceries", 650.0)).unwrap();
        assert_eq!(updated.monthly_limit, 650.0);

        db.delete_budget(id).unwrap();
        assert_eq!(db.count_budgets().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_budget_category_rejected() {
        let db = Database::in_memory().unwrap();
        db.create_budget(&new_budget("Dining", 200.0)).unwrap();
        let other = db.create_budget(&new_budget("Fuel", 150.0)).unwrap();

        assert!(matches!(
            db.create_budget(&new_budget("Dining", 300.0)),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            db.update_budget(other, &new_budget("Dining", 150.0)),
            Err(Error::InvalidData(_))
        ));
        // Exact match only: different case is a different category
        db.create_budget(&new_budget("dining", 50.0)).unwrap();
    }

    #[test]
    fn test_budget_limit_must_be_positive() {
        let db = Database::in_memory().unwrap();
        assert!(db.create_budget(&new_budget("Zero", 0.0)).is_err());
        assert!(db.create_budget(&new_budget("NaN", f64::NAN)).is_err());
    }

    #[test]
    fn test_expense_filters() {
        let db = Database::in_memory().unwrap();
        db.create_expense(&new_expense("Dining", 20.0, d(2026, 2, 28))).unwrap();
        db.create_expense(&new_expense("Dining", 35.0, d(2026, 3, 1))).unwrap();
        db.create_expense(&new_expense("Fuel", 50.0, d(2026, 3, 31))).unwrap();
        db.create_expense(&new_expense("Dining", -5.0, d(2026, 3, 15))).unwrap();

        let march = db.list_expenses(&ExpenseFilter::for_month(2026, 3).unwrap()).unwrap();
        assert_eq!(march.len(), 3);
        assert_eq!(march[0].date, d(2026, 3, 31));

        let dining = db
            .list_expenses(&ExpenseFilter::parse_month("2026-03").unwrap().with_category("Dining"))
            .unwrap();
        assert_eq!(dining.len(), 2);

        assert_eq!(db.total_expenses(d(2026, 3, 1), d(2026, 3, 31)).unwrap(), 80.0);
        assert!(ExpenseFilter::parse_month("March").is_err());
        assert!(ExpenseFilter::parse_month("2026-13").is_err());
    }

    #[test]
    fn test_evaluate_budgets_persists_alerts() {
        let db = Database::in_memory().unwrap();
        db.create_budget(&new_budget("Dining", 1_000.0)).unwrap();
        db.create_expense(&new_expense("Dining", 750.0, d(2026, 3, 5))).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 20, 8, 0, 0).unwrap();

        let first = db.evaluate_budgets(now, true).unwrap();
        assert_eq!(first.statuses[0].tier, StatusTier::Warning);
        assert_eq!(first.alerts.len(), 2);
        assert_eq!(db.count_unread_notifications().unwrap(), 2);

        let second = db.evaluate_budgets(now, true).unwrap();
        assert!(second.alerts.is_empty());
        assert_eq!(db.count_unread_notifications().unwrap(), 2);

        // A fresh pool over the same file remembers what fired
        let reopened = Database::new_unencrypted(db.path()).unwrap();
        assert!(reopened.evaluate_budgets(now, true).unwrap().alerts.is_empty());

        let keys = db.fired_alert_keys(2026, 3).unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[1].threshold, AlertThreshold::SeventyFive);
    }

    #[test]
    fn test_failed_notification_write_keeps_alert_pending() {
        let db = Database::in_memory().unwrap();
        db.create_budget(&new_budget("Dining", 100.0)).unwrap();
        db.create_expense(&new_expense("Dining", 60.0, d(2026, 3, 5))).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 20, 8, 0, 0).unwrap();

        db.conn()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER block_notifications BEFORE INSERT ON notifications
                 BEGIN SELECT RAISE(ABORT, 'notifications unavailable'); END;",
            )
            .unwrap();
        assert!(db.evaluate_budgets(now, true).is_err());
        assert!(db.fired_alert_keys(2026, 3).unwrap().is_empty());

        db.conn()
            .unwrap()
            .execute_batch("DROP TRIGGER block_notifications;")
            .unwrap();
        let retry = db.evaluate_budgets(now, true).unwrap();
        assert_eq!(retry.alerts.len(), 1);
        assert_eq!(retry.alerts[0].threshold, AlertThreshold::Fifty);
        assert_eq!(db.count_unread_notifications().unwrap(), 1);
        assert_eq!(db.fired_alert_keys(2026, 3).unwrap().len(), 1);
    }

    #[test]
    fn test_alert_ledger_insert_once() {
        let mut db = Database::in_memory().unwrap();
        let key = crate::budget::AlertKey {
            category: "Fuel".to_string(),
            threshold: AlertThreshold::Ninety,
            month: 4,
            year: 2026,
        };
        assert!(db.try_record(&key).unwrap());
        assert!(!db.try_record(&key).unwrap());
    }

    #[test]
    fn test_process_due_recurring() {
        let db = Database::in_memory().unwrap();
        let rent = db
            .create_recurring(&NewRecurringTransaction {
                kind: RecurringKind::Expense,
                name: "Rent".to_string(),
                category: Some("Housing".to_string()),
                amount: 1_500.0,
                currency: "USD".to_string(),
                frequency: Frequency::Monthly,
                start_date: d(2026, 1, 31),
            })
            .unwrap();
        db.create_recurring(&NewRecurringTransaction {
            kind: RecurringKind::Income,
            name: "Salary".to_string(),
            category: None,
            amount: 2_000.0,
            currency: "USD".to_string(),
            frequency: Frequency::Biweekly,
            start_date: d(2026, 3, 27),
        })
        .unwrap();

        let summary = db.process_due_recurring(d(2026, 4, 15), 366).unwrap();
        assert_eq!(summary.expenses_created, 3);
        assert_eq!(summary.incomes_created, 2);
        assert_eq!(summary.rules_processed, 2);

        let rule = db.get_recurring(rent).unwrap().unwrap();
        assert_eq!(rule.next_date, d(2026, 4, 30));
        assert_eq!(rule.anchor_day, 31);

        let housing = db
            .list_expenses(&ExpenseFilter::default().with_category("Housing"))
            .unwrap();
        let dates: Vec<NaiveDate> = housing.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![d(2026, 3, 31), d(2026, 2, 28), d(2026, 1, 31)]);
        assert!(housing.iter().all(|e| e.recurring_id == Some(rent)));

        // Nothing new on a second run the same day
        let again = db.process_due_recurring(d(2026, 4, 15), 366).unwrap();
        assert_eq!(again.total_created(), 0);
    }

    #[test]
    fn test_recurring_catch_up_cap_and_pause() {
        let db = Database::in_memory().unwrap();
        let coffee = db
            .create_recurring(&NewRecurringTransaction {
                kind: RecurringKind::Expense,
                name: "Coffee".to_string(),
                category: Some("Dining".to_string()),
                amount: 4.0,
                currency: "USD".to_string(),
                frequency: Frequency::Daily,
                start_date: d(2026, 1, 1),
            })
            .unwrap();

        let summary = db.process_due_recurring(d(2026, 1, 31), 10).unwrap();
        assert_eq!(summary.expenses_created, 10);
        assert_eq!(summary.rules_capped, 1);

        db.set_recurring_active(coffee, false).unwrap();
        assert_eq!(db.count_recurring().unwrap(), 0);
        assert_eq!(db.process_due_recurring(d(2026, 1, 31), 10).unwrap().total_created(), 0);
        assert_eq!(db.list_recurring(true).unwrap().len(), 1);
    }

    #[test]
    fn test_recurring_expense_needs_category() {
        let db = Database::in_memory().unwrap();
        let result = db.create_recurring(&NewRecurringTransaction {
            kind: RecurringKind::Expense,
            name: "Gym".to_string(),
            category: None,
            amount: 40.0,
            currency: "USD".to_string(),
            frequency: Frequency::Monthly,
            start_date: d(2026, 1, 1),
        });
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_delete_recurring_keeps_records() {
        let db = Database::in_memory().unwrap();
        let id = db
            .create_recurring(&NewRecurringTransaction {
                kind: RecurringKind::Expense,
                name: "Streaming".to_string(),
                category: Some("Entertainment".to_string()),
                amount: 15.0,
                currency: "USD".to_string(),
                frequency: Frequency::Monthly,
                start_date: d(2026, 1, 10),
            })
            .unwrap();
        db.process_due_recurring(d(2026, 2, 10), 366).unwrap();

        db.delete_recurring(id).unwrap();
        let expenses = db.list_expenses(&ExpenseFilter::default()).unwrap();
        assert_eq!(expenses.len(), 2);
        assert!(expenses.iter().all(|e| e.recurring_id.is_none()));
        assert!(matches!(db.delete_recurring(id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_notifications_read_state() {
        let db = Database::in_memory().unwrap();
        let make = |title: &str| NewNotification {
            notification_type: NotificationType::System,
            title: title.to_string(),
            message: "hello".to_string(),
            priority: Priority::Normal,
            related_id: None,
            action_url: None,
        };
        let first = db.create_notification(&make("one")).unwrap();
        db.create_notification(&make("two")).unwrap();
        let third = db.create_notification(&make("three")).unwrap();

        db.mark_notification_read(first).unwrap();
        assert_eq!(db.count_unread_notifications().unwrap(), 2);
        assert_eq!(db.list_notifications(false, 50).unwrap().len(), 2);
        assert_eq!(db.list_notifications(true, 50).unwrap().len(), 3);

        db.delete_notification(third).unwrap();
        assert_eq!(db.mark_all_notifications_read().unwrap(), 1);
        assert_eq!(db.count_unread_notifications().unwrap(), 0);
        assert!(matches!(db.mark_notification_read(999), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_dashboard_stats() {
        let db = Database::in_memory().unwrap();
        db.create_debt(&new_debt("Visa", 5_000.0, 20.0, 100.0)).unwrap();
        db.create_debt(&new_debt("Loan", 2_000.0, 10.0, 50.0)).unwrap();
        db.create_budget(&new_budget("Dining", 100.0)).unwrap();
        db.create_budget(&new_budget("Fuel", 200.0)).unwrap();
        db.create_expense(&new_expense("Dining", 120.0, d(2026, 5, 3))).unwrap();
        db.create_expense(&new_expense("Fuel", 30.0, d(2026, 5, 4))).unwrap();
        db.create_expense(&new_expense("Fuel", 500.0, d(2026, 4, 30))).unwrap();
        db.create_income(&NewIncome {
            source: "Salary".to_string(),
            amount: 3_000.0,
            currency: "USD".to_string(),
            date: d(2026, 5, 1),
            recurring_id: None,
        })
        .unwrap();

        let stats = db.get_dashboard_stats(d(2026, 5, 20)).unwrap();
        assert_eq!(stats.total_debt, 7_000.0);
        assert_eq!(stats.total_minimum_payments, 150.0);
        assert_eq!(stats.debt_count, 2);
        assert_eq!(stats.budget_count, 2);
        assert_eq!(stats.budgets_over_limit, 1);
        assert_eq!(stats.month_spending, 150.0);
        assert_eq!(stats.month_income, 3_000.0);
        assert_eq!(stats.net_cash_flow, 2_850.0);
    }

    #[test]
    fn test_income_crud() {
        let db = Database::in_memory().unwrap();
        let id = db
            .create_income(&NewIncome {
                source: "Freelance".to_string(),
                amount: 800.0,
                currency: "USD".to_string(),
                date: d(2026, 6, 2),
                recurring_id: None,
            })
            .unwrap();

        assert_eq!(db.list_incomes(Some(d(2026, 6, 1)), None).unwrap().len(), 1);
        assert!(db.list_incomes(None, Some(d(2026, 5, 31))).unwrap().is_empty());
        db.delete_income(id).unwrap();
        assert!(db.list_incomes(None, None).unwrap().is_empty());
    }

    #[test]
    fn test_audit_log() {
        let db = Database::in_memory().unwrap();
        db.log_audit("a@example.com", "create_debt", Some("debt"), Some(1), None)
            .unwrap();
        db.log_audit("a@example.com", "delete_debt", Some("debt"), Some(1), Some("cleanup"))
            .unwrap();

        let entries = db.list_audit_log(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "delete_debt");
        assert_eq!(entries[0].details.as_deref(), Some("cleanup"));
    }
}
