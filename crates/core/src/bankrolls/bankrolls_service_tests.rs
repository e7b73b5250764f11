#[cfg(test)]
mod tests {
    use crate::bankrolls::*;
    use crate::errors::{Error, Result};
    use crate::sessions::{Session, SessionStatus};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    // --- Mock BankrollApi ---
    #[derive(Clone, Default)]
    struct MockBankrollApi {
        calls: Arc<Mutex<Vec<String>>>,
        last_filter: Arc<Mutex<Option<BankrollSessionFilter>>>,
    }

    impl MockBankrollApi {
        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn bankroll(id: &str, name: &str) -> Bankroll {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "type": "live",
            "currency": "USD",
            "starting_amount": 500,
            "current_amount": 650
        }))
        .unwrap()
    }

    #[async_trait]
    impl BankrollApiTrait for MockBankrollApi {
        async fn list(&self) -> Result<Vec<Bankroll>> {
            self.record("list");
            Ok(vec![bankroll("1", "Live"), bankroll("2", "Online")])
        }

        async fn get(&self, bankroll_id: &str) -> Result<Bankroll> {
            self.record("get");
            Ok(bankroll(bankroll_id, "Live"))
        }

        async fn create(&self, new_bankroll: &NewBankroll) -> Result<Bankroll> {
            self.record("create");
            let mut created = bankroll("9", &new_bankroll.name);
            created.starting_amount = new_bankroll.starting_amount;
            created.current_amount = new_bankroll.starting_amount;
            Ok(created)
        }

        async fn update(&self, bankroll_id: &str, update: &BankrollUpdate) -> Result<Bankroll> {
            self.record("update");
            let mut updated = bankroll(bankroll_id, "Live");
            if let Some(name) = &update.name {
                updated.name = name.clone();
            }
            Ok(updated)
        }

        async fn archive(&self, bankroll_id: &str) -> Result<Bankroll> {
            self.record("archive");
            let mut archived = bankroll(bankroll_id, "Live");
            archived.is_archived = true;
            Ok(archived)
        }

        async fn delete(&self, _bankroll_id: &str) -> Result<bool> {
            self.record("delete");
            Ok(true)
        }

        async fn sessions(
            &self,
            _bankroll_id: &str,
            filter: &BankrollSessionFilter,
        ) -> Result<Vec<Session>> {
            self.record("sessions");
            *self.last_filter.lock().unwrap() = Some(filter.clone());
            Ok(Vec::new())
        }

        async fn active_session(&self, _bankroll_id: &str) -> Result<Option<Session>> {
            self.record("active_session");
            Ok(None)
        }

        async fn stats(&self) -> Result<BankrollStats> {
            self.record("stats");
            Ok(BankrollStats {
                total_bankrolls: 2,
                total_starting_amount: dec!(1000),
                total_current_amount: dec!(1300),
                total_profit: dec!(300),
            })
        }
    }

    fn service() -> (BankrollService, MockBankrollApi) {
        let api = MockBankrollApi::default();
        (BankrollService::new(Arc::new(api.clone())), api)
    }

    fn new_bankroll() -> NewBankroll {
        NewBankroll {
            name: "Live".to_string(),
            bankroll_type: BankrollType::Live,
            currency: "USD".to_string(),
            starting_amount: dec!(500),
            goal_amount: Some(dec!(2000)),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_validates_before_request() {
        let (service, api) = service();

        let mut invalid = new_bankroll();
        invalid.starting_amount = dec!(0);
        invalid.goal_amount = Some(dec!(-1));
        let err = service.create_bankroll(invalid).await.unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(api.calls().is_empty());

        let created = service.create_bankroll(new_bankroll()).await.unwrap();
        assert_eq!(created.current_amount, dec!(500));
        assert_eq!(api.calls(), vec!["create"]);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_name_locally() {
        let (service, api) = service();
        let update = BankrollUpdate {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(service.update_bankroll("1", update).await.is_err());
        assert!(api.calls().is_empty());

        let update = BankrollUpdate {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert_eq!(
            service.update_bankroll("1", update).await.unwrap().name,
            "Renamed"
        );
    }

    #[tokio::test]
    async fn test_sessions_default_to_one_page() {
        let (service, api) = service();

        service
            .bankroll_sessions("1", BankrollSessionFilter::default())
            .await
            .unwrap();
        let filter = api.last_filter.lock().unwrap().clone().unwrap();
        assert_eq!(filter.limit, Some(DEFAULT_SESSION_PAGE_SIZE));

        let explicit = BankrollSessionFilter {
            status: Some(SessionStatus::Completed),
            limit: Some(5),
            offset: Some(10),
        };
        service.bankroll_sessions("1", explicit.clone()).await.unwrap();
        assert_eq!(api.last_filter.lock().unwrap().clone(), Some(explicit));
    }

    #[tokio::test]
    async fn test_archive_delete_and_stats_pass_through() {
        let (service, api) = service();

        assert!(service.archive_bankroll("1").await.unwrap().is_archived);
        assert!(service.delete_bankroll("1").await.unwrap());
        assert_eq!(service.bankroll_stats().await.unwrap().total_profit, dec!(300));
        assert_eq!(service.list_bankrolls().await.unwrap().len(), 2);
        assert_eq!(api.calls(), vec!["archive", "delete", "stats", "list"]);
    }
}
