#[cfg(test)]
mod tests {
    use crate::bankrolls::*;
    use crate::errors::{Error, Result, ValidationError};
    use crate::overlay::*;
    use crate::sessions::Session;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    enum SessionRead {
        Active(Session),
        Missing,
        Broken,
    }

    struct MockBankrollApi {
        bankroll: Bankroll,
        session: Mutex<SessionRead>,
    }

    fn unused<T>() -> Result<T> {
        Err(Error::Unexpected("not used by overlays".to_string()))
    }

    #[async_trait]
    impl BankrollApiTrait for MockBankrollApi {
        async fn list(&self) -> Result<Vec<Bankroll>> {
            unused()
        }

        async fn get(&self, bankroll_id: &str) -> Result<Bankroll> {
            if bankroll_id == self.bankroll.id {
                Ok(self.bankroll.clone())
            } else {
                Err(Error::rejected("Bankroll not found"))
            }
        }

        async fn create(&self, _new_bankroll: &NewBankroll) -> Result<Bankroll> {
            unused()
        }

        async fn update(&self, _bankroll_id: &str, _update: &BankrollUpdate) -> Result<Bankroll> {
            unused()
        }

        async fn archive(&self, _bankroll_id: &str) -> Result<Bankroll> {
            unused()
        }

        async fn delete(&self, _bankroll_id: &str) -> Result<bool> {
            unused()
        }

        async fn sessions(
            &self,
            _bankroll_id: &str,
            _filter: &BankrollSessionFilter,
        ) -> Result<Vec<Session>> {
            unused()
        }

        async fn active_session(&self, _bankroll_id: &str) -> Result<Option<Session>> {
            match &*self.session.lock().unwrap() {
                SessionRead::Active(session) => Ok(Some(session.clone())),
                SessionRead::Missing => Ok(None),
                SessionRead::Broken => Err(Error::unreachable("timeout")),
            }
        }

        async fn stats(&self) -> Result<BankrollStats> {
            unused()
        }
    }

    fn bankroll() -> Bankroll {
        serde_json::from_value(json!({
            "id": 7,
            "name": "Stream Roll",
            "type": "online",
            "currency": "EUR",
            "starting_amount": "1000",
            "current_amount": "1250.5",
        }))
        .unwrap()
    }

    fn running_session() -> Session {
        serde_json::from_value(json!({
            "id": 31,
            "bankroll_id": 7,
            "name": "Sunday grind",
            "status": "running",
            "total_buyins": "150",
            "total_cashes": "320",
            "cash_count": "2",
        }))
        .unwrap()
    }

    fn service(read: SessionRead) -> OverlayService {
        OverlayService::new(Arc::new(MockBankrollApi {
            bankroll: bankroll(),
            session: Mutex::new(read),
        }))
    }

    #[tokio::test]
    async fn test_snapshot_with_active_session() {
        let snapshot = service(SessionRead::Active(running_session()))
            .snapshot("7")
            .await
            .unwrap();

        assert!(snapshot.has_active_session());
        assert_eq!(snapshot.total_buyins, dec!(150));
        assert_eq!(snapshot.cash_count, 2);
        assert_eq!(OverlayKind::Buyins.render(&snapshot), "Buy-Ins: 150.00 EUR");
        assert_eq!(OverlayKind::Cashes.render(&snapshot), "Cashes: 320.00 EUR");
        assert_eq!(OverlayKind::CashCount.render(&snapshot), "Cashes: 2");
        assert_eq!(
            OverlayKind::Bankroll.render(&snapshot),
            "Stream Roll: 1250.50 EUR (+250.50 EUR)"
        );
    }

    #[tokio::test]
    async fn test_failed_session_read_is_empty_snapshot() {
        for read in [SessionRead::Missing, SessionRead::Broken] {
            let snapshot = service(read).snapshot("7").await.unwrap();
            assert!(!snapshot.has_active_session());
            assert_eq!(snapshot.total_buyins, dec!(0));
            assert_eq!(snapshot.cash_count, 0);
            assert_eq!(snapshot.current_amount, dec!(1250.5));
        }
    }

    #[tokio::test]
    async fn test_completed_session_is_not_shown() {
        let mut session = running_session();
        session.status = crate::sessions::SessionStatus::Completed;
        let snapshot = service(SessionRead::Active(session)).snapshot("7").await.unwrap();
        assert!(!snapshot.has_active_session());
    }

    #[tokio::test]
    async fn test_unknown_bankroll_fails_the_poll() {
        let err = service(SessionRead::Missing)
            .render("99", OverlayKind::Bankroll)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Rejected { .. }));
    }

    #[test]
    fn test_losing_bankroll_renders_without_plus() {
        let mut roll = bankroll();
        roll.current_amount = dec!(940);
        let snapshot = OverlaySnapshot::new(&roll, None);
        assert_eq!(
            OverlayKind::Bankroll.render(&snapshot),
            "Stream Roll: 940.00 EUR (-60.00 EUR)"
        );
    }

    #[test]
    fn test_query_from_url() {
        let query =
            OverlayQuery::from_url("http://localhost:3000/obs/cash-count?bankroll=7").unwrap();
        assert_eq!(query.bankroll_id, "7");
        assert_eq!(query.kind, Some(OverlayKind::CashCount));

        let query = OverlayQuery::from_url("http://localhost:3000/?bankroll=abc&x=1").unwrap();
        assert_eq!(query.bankroll_id, "abc");
        assert_eq!(query.kind, None);
    }

    #[test]
    fn test_query_requires_bankroll() {
        let err = OverlayQuery::from_url("http://localhost:3000/obs/buyins").unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingField(ref f)) if f == "bankroll"
        ));
        assert!(OverlayQuery::from_url("http://localhost/obs?bankroll=").is_err());
        assert!(OverlayQuery::from_url("not a url").is_err());
    }

    #[test]
    fn test_overlay_kind_parsing() {
        for kind in OverlayKind::ALL {
            assert_eq!(kind.as_str().parse::<OverlayKind>().unwrap(), kind);
        }
        assert_eq!("cash_count".parse::<OverlayKind>().unwrap(), OverlayKind::CashCount);
        assert!("chips".parse::<OverlayKind>().is_err());
    }
}
