//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rates_types::{Currency, CurrencyDirectory, CurrencyId, Rate, RepoError};
    use rust_decimal_macros::dec;

    use crate::SqliteRepo;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn usd() -> Currency {
        Currency::new(CurrencyId::new(431), "USD", "US Dollar", 1).unwrap()
    }

    fn rub() -> Currency {
        Currency::new(CurrencyId::new(456), "RUB", "Russian Ruble", 100).unwrap()
    }

    async fn seeded_repo() -> SqliteRepo {
        let repo = setup_repo().await;
        repo.upsert_currencies(vec![usd(), rub()]).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_upsert_and_find_currency() {
        let repo = seeded_repo().await;

        let found = repo.find_by_abbreviation("USD").await.unwrap().unwrap();

        assert_eq!(found, usd());
    }

    #[tokio::test]
    async fn test_find_currency_not_found() {
        let repo = seeded_repo().await;

        let result = repo.find_by_abbreviation("XYZ").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_currency_is_case_sensitive() {
        let repo = seeded_repo().await;

        let result = repo.find_by_abbreviation("usd").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_currencies_ordered_by_abbreviation() {
        let repo = seeded_repo().await;

        let currencies = repo.list_currencies().await.unwrap();

        let codes: Vec<_> = currencies.iter().map(|c| c.abbreviation.as_str()).collect();
        assert_eq!(codes, vec!["RUB", "USD"]);
    }

    #[tokio::test]
    async fn test_upsert_updates_existing_currency() {
        let repo = seeded_repo().await;

        let renamed = Currency::new(CurrencyId::new(431), "USD", "United States Dollar", 1).unwrap();
        let written = repo.upsert_currencies(vec![renamed.clone()]).await.unwrap();

        assert_eq!(written, 1);
        assert_eq!(repo.find_by_abbreviation("USD").await.unwrap(), Some(renamed));
        assert_eq!(repo.list_currencies().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_upsert_abbreviation_moved_to_new_id_replaces_old() {
        let repo = seeded_repo().await;
        repo.save_rate(Rate::new(CurrencyId::new(431), day(1), dec!(3.20)))
            .await
            .unwrap();

        let moved = Currency::new(CurrencyId::new(840), "USD", "US Dollar", 1).unwrap();
        repo.upsert_currencies(vec![moved.clone()]).await.unwrap();

        assert_eq!(repo.find_by_abbreviation("USD").await.unwrap(), Some(moved));
        assert_eq!(repo.list_currencies().await.unwrap().len(), 2);
        assert!(repo.list_rates(CurrencyId::new(431)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_rate_assigns_id() {
        let repo = seeded_repo().await;

        let saved = repo
            .save_rate(Rate::new(CurrencyId::new(431), day(1), dec!(3.2014)))
            .await
            .unwrap();

        assert!(saved.id.is_some());
        assert_eq!(saved.currency_id, CurrencyId::new(431));
        assert_eq!(saved.date, day(1));
        assert_eq!(saved.official_rate, dec!(3.2014));
    }

    #[tokio::test]
    async fn test_find_rate_by_date() {
        let repo = seeded_repo().await;
        let saved = repo
            .save_rate(Rate::new(CurrencyId::new(431), day(1), dec!(3.2014)))
            .await
            .unwrap();

        let found = repo.find_rate(CurrencyId::new(431), day(1)).await.unwrap();
        let other_day = repo.find_rate(CurrencyId::new(431), day(2)).await.unwrap();
        let other_currency = repo.find_rate(CurrencyId::new(456), day(1)).await.unwrap();

        assert_eq!(found, Some(saved));
        assert!(other_day.is_none());
        assert!(other_currency.is_none());
    }

    #[tokio::test]
    async fn test_save_rate_keeps_one_rate_per_day() {
        let repo = seeded_repo().await;

        let first = repo
            .save_rate(Rate::new(CurrencyId::new(431), day(1), dec!(3.2014)))
            .await
            .unwrap();
        let second = repo
            .save_rate(Rate::new(CurrencyId::new(431), day(1), dec!(3.2100)))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.official_rate, dec!(3.2100));
        assert_eq!(repo.list_rates(CurrencyId::new(431)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_rate_preserves_precision_and_scale() {
        let repo = seeded_repo().await;

        let saved = repo
            .save_rate(
                Rate::new(CurrencyId::new(456), day(1), dec!(3.569312345678901234)).with_scale(100),
            )
            .await
            .unwrap();

        let found = repo
            .find_rate(CurrencyId::new(456), day(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, saved);
        assert_eq!(found.official_rate, dec!(3.569312345678901234));
        assert_eq!(found.scale, 100);
    }

    #[tokio::test]
    async fn test_save_rate_for_unknown_currency_fails() {
        let repo = seeded_repo().await;

        let result = repo
            .save_rate(Rate::new(CurrencyId::new(9999), day(1), dec!(1.0)))
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_rates_newest_first() {
        let repo = seeded_repo().await;
        for (d, value) in [(1, dec!(3.20)), (3, dec!(3.22)), (2, dec!(3.21))] {
            repo.save_rate(Rate::new(CurrencyId::new(431), day(d), value))
                .await
                .unwrap();
        }

        let rates = repo.list_rates(CurrencyId::new(431)).await.unwrap();

        let dates: Vec<_> = rates.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(3), day(2), day(1)]);
    }
}
