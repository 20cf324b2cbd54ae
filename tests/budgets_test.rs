mod common;

use anyhow::Result;
use common::{parse_date, reopen, test_service};
use fintrack::application::AppError;
use fintrack::domain::{Budget, TransactionType, YearMonth};

#[tokio::test]
async fn test_budget_set_and_list() -> Result<()> {
    let (mut service, temp) = test_service().await?;

    service.upsert_budget("Food", 50000).await?;
    service.upsert_budget("Utilities", 15000).await?;

    assert_eq!(
        service.list_budgets(),
        &[Budget::new("Food", 50000), Budget::new("Utilities", 15000)]
    );

    let reopened = reopen(&temp).await?;
    assert_eq!(reopened.list_budgets().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_budget_upsert_overwrites() -> Result<()> {
    let (mut service, temp) = test_service().await?;

    service.upsert_budget("Food", 50000).await?;
    let updated = service.upsert_budget("Food", 42000).await?;

    assert_eq!(updated, Budget::new("Food", 42000));
    assert_eq!(service.list_budgets().len(), 1);
    assert_eq!(reopen(&temp).await?.list_budgets(), &[Budget::new("Food", 42000)]);

    Ok(())
}

#[tokio::test]
async fn test_budget_empty_category_rejected() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    let result = service.upsert_budget("  ", 1000).await;
    assert!(matches!(result, Err(AppError::InvalidInput(_))));
    assert!(service.list_budgets().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_budget_status_scenario() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    let month: YearMonth = "2024-01".parse()?;

    service.upsert_budget("Food", 50000).await?;
    service
        .add_transaction(TransactionType::Expense, "Market", 20000, "Food", parse_date("2024-01-04"))
        .await?;
    service
        .add_transaction(TransactionType::Expense, "Market", 25000, "Food", parse_date("2024-01-18"))
        .await?;
    // Outside the month, another category, and income never count
    service
        .add_transaction(TransactionType::Expense, "Market", 9900, "Food", parse_date("2024-02-01"))
        .await?;
    service
        .add_transaction(TransactionType::Expense, "Power", 9900, "Utilities", parse_date("2024-01-10"))
        .await?;
    service
        .add_transaction(TransactionType::Income, "Refund", 9900, "Food", parse_date("2024-01-10"))
        .await?;

    let report = service.budget_report(month);
    assert_eq!(report.month, month);
    assert_eq!(report.budgets.len(), 1);

    let food = &report.budgets[0];
    assert_eq!(food.spent, 45000);
    assert_eq!(food.percentage, 90);
    assert_eq!(food.remaining, 5000);
    assert_eq!(food.remaining, food.limit - food.spent);

    Ok(())
}

#[tokio::test]
async fn test_budget_status_percentage_bounds() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    let month: YearMonth = "2024-03".parse()?;

    service.upsert_budget("Food", 10000).await?;
    service.upsert_budget("Housing", 0).await?;
    service.upsert_budget("Education", 30000).await?;
    service
        .add_transaction(TransactionType::Expense, "Feast", 35000, "Food", parse_date("2024-03-02"))
        .await?;
    service
        .add_transaction(TransactionType::Expense, "Repair", 500, "Housing", parse_date("2024-03-02"))
        .await?;

    let report = service.budget_report(month);
    for progress in &report.budgets {
        assert!(progress.percentage <= 100);
        assert_eq!(progress.remaining, progress.limit - progress.spent);
    }

    assert_eq!(report.budgets[0].percentage, 100);
    assert_eq!(report.budgets[0].remaining, -25000);
    assert!(report.budgets[0].is_over());
    assert_eq!(report.budgets[1].percentage, 100);
    assert_eq!(report.budgets[2].percentage, 0);
    assert_eq!(report.budgets[2].spent, 0);

    Ok(())
}

#[tokio::test]
async fn test_budget_remove() -> Result<()> {
    let (mut service, temp) = test_service().await?;

    service.upsert_budget("Food", 50000).await?;
    let removed = service.remove_budget("Food").await?;
    assert_eq!(removed.category, "Food");
    assert!(reopen(&temp).await?.list_budgets().is_empty());

    let result = service.remove_budget("Food").await;
    assert!(matches!(result, Err(AppError::BudgetNotFound(_))));

    Ok(())
}
