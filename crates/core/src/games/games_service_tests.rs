#[cfg(test)]
mod tests {
    use crate::bankrolls::{AdjustmentSource, Bankroll, BankrollAdjustment, BankrollType};
    use crate::errors::{Error, Result};
    use crate::events::{ClientEvent, MockClientEventSink};
    use crate::games::*;
    use crate::sessions::{Session, SessionStatus};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    // --- Mock GameApi ---
    #[derive(Clone, Default)]
    struct MockGameApi {
        games: Arc<Mutex<Vec<Game>>>,
        server_bankroll: Arc<Mutex<Option<Bankroll>>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockGameApi {
        fn find(&self, game_id: &str) -> Result<Game> {
            self.games
                .lock()
                .unwrap()
                .iter()
                .find(|g| g.id == game_id)
                .cloned()
                .ok_or_else(|| Error::rejected("Game not found"))
        }

        fn store(&self, game: Game) {
            let mut games = self.games.lock().unwrap();
            games.retain(|g| g.id != game.id);
            games.push(game);
        }

        fn with_bankroll(&self, game: Game) -> GameWithBankroll {
            GameWithBankroll {
                game,
                bankroll: self.server_bankroll.lock().unwrap().clone(),
            }
        }
    }

    #[async_trait]
    impl GameApiTrait for MockGameApi {
        async fn create(&self, new_game: &NewGame) -> Result<GameWithBankroll> {
            self.calls.lock().unwrap().push("create".to_string());
            let game = Game {
                id: format!("g-{}", self.games.lock().unwrap().len() + 1),
                session_id: Some(new_game.session_id.clone()),
                name: new_game.name.clone(),
                game_type: new_game.game_type,
                buy_in: new_game.buy_in,
                entries: new_game.entries,
                winnings: Decimal::ZERO,
                status: GameStatus::Running,
                created_at: None,
                updated_at: None,
            };
            self.store(game.clone());
            Ok(self.with_bankroll(game))
        }

        async fn list_for_session(&self, session_id: &str) -> Result<Vec<Game>> {
            Ok(self
                .games
                .lock()
                .unwrap()
                .iter()
                .filter(|g| g.session_id.as_deref() == Some(session_id))
                .cloned()
                .collect())
        }

        async fn update(&self, game_id: &str, update: &GameUpdate) -> Result<Game> {
            let mut game = self.find(game_id)?;
            if let Some(name) = &update.name {
                game.name = name.clone();
            }
            self.store(game.clone());
            Ok(game)
        }

        async fn update_entries(&self, game_id: &str, entries: u32) -> Result<GameWithBankroll> {
            let mut game = self.find(game_id)?;
            game.entries = entries;
            self.store(game.clone());
            Ok(self.with_bankroll(game))
        }

        async fn complete(&self, game_id: &str, winnings: Decimal) -> Result<GameWithBankroll> {
            let mut game = self.find(game_id)?;
            game.winnings = winnings;
            game.status = GameStatus::Completed;
            self.store(game.clone());
            Ok(self.with_bankroll(game))
        }

        async fn bust(&self, game_id: &str) -> Result<GameWithBankroll> {
            self.complete(game_id, Decimal::ZERO).await
        }
    }

    // --- Helpers ---

    fn running_session() -> Session {
        Session {
            id: "s-1".to_string(),
            bankroll_id: Some("br-1".to_string()),
            bankroll: None,
            name: None,
            start_time: None,
            end_time: None,
            status: SessionStatus::Running,
            total_buyins: Decimal::ZERO,
            total_cashes: Decimal::ZERO,
            game_count: 0,
            cash_count: 0,
        }
    }

    fn bankroll_at(amount: Decimal) -> Bankroll {
        Bankroll {
            id: "br-1".to_string(),
            name: "Main".to_string(),
            bankroll_type: BankrollType::Online,
            currency: "USD".to_string(),
            starting_amount: dec!(1000),
            current_amount: amount,
            goal_amount: None,
            status: None,
            is_archived: false,
            created_at: None,
            updated_at: None,
        }
    }

    fn new_game(buy_in: Decimal, entries: u32) -> NewGame {
        NewGame {
            entries,
            ..NewGame::new("s-1", "Sunday Million", GameType::Mtt, buy_in)
        }
    }

    fn service_with(api: &MockGameApi) -> (GameService, MockClientEventSink) {
        let sink = MockClientEventSink::new();
        let service = GameService::new(Arc::new(api.clone()), Arc::new(sink.clone()));
        (service, sink)
    }

    fn adjustments(sink: &MockClientEventSink) -> Vec<BankrollAdjustment> {
        sink.events()
            .into_iter()
            .filter_map(|e| match e {
                ClientEvent::BankrollAdjusted(adj) => Some(adj),
                _ => None,
            })
            .collect()
    }

    // ==================== Start ====================

    #[tokio::test]
    async fn test_start_game_takes_buy_in_times_entries() {
        let api = MockGameApi::default();
        *api.server_bankroll.lock().unwrap() = Some(bankroll_at(dec!(900)));
        let (service, sink) = service_with(&api);
        let bankroll = bankroll_at(dec!(1000));

        let start = service
            .start_game(&running_session(), new_game(dec!(50), 2))
            .await
            .unwrap();

        assert_eq!(start.adjustment.amount, dec!(-100));
        assert_eq!(start.adjustment.source, AdjustmentSource::GameStart);
        assert_eq!(
            bankroll.with_adjustment(&start.adjustment).current_amount,
            dec!(900)
        );
        assert_eq!(start.bankroll.unwrap().current_amount, dec!(900));
        assert_eq!(adjustments(&sink), vec![start.adjustment]);
    }

    #[tokio::test]
    async fn test_start_game_validates_before_any_request() {
        let api = MockGameApi::default();
        let (service, sink) = service_with(&api);

        let err = service
            .start_game(&running_session(), new_game(Decimal::ZERO, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let mut completed = running_session();
        completed.status = SessionStatus::Completed;
        let err = service
            .start_game(&completed, new_game(dec!(10), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert!(api.calls.lock().unwrap().is_empty());
        assert!(sink.is_empty());
    }

    // ==================== Entries ====================

    #[test]
    fn test_entries_adjustment_formula() {
        assert_eq!(GameService::entries_adjustment(dec!(50), 2, 3), dec!(-50));
        assert_eq!(GameService::entries_adjustment(dec!(50), 3, 1), dec!(100));
        assert_eq!(GameService::entries_adjustment(dec!(50), 2, 2), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_update_entries_emits_only_bankroll_signal() {
        let api = MockGameApi::default();
        let (service, sink) = service_with(&api);
        let start = service
            .start_game(&running_session(), new_game(dec!(25), 1))
            .await
            .unwrap();
        sink.clear();

        let update = service.update_entries(&start.game, "br-1", 3).await.unwrap();

        assert_eq!(update.game.entries, 3);
        let adjustment = update.adjustment.unwrap();
        assert_eq!(adjustment.amount, dec!(-50));
        assert_eq!(adjustment.source, AdjustmentSource::EntryUpdate);
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert!(!events[0].affects_sessions());
    }

    #[tokio::test]
    async fn test_unchanged_entries_emit_nothing() {
        let api = MockGameApi::default();
        let (service, sink) = service_with(&api);
        let start = service
            .start_game(&running_session(), new_game(dec!(25), 2))
            .await
            .unwrap();
        sink.clear();

        let update = service.update_entries(&start.game, "br-1", 2).await.unwrap();

        assert!(update.adjustment.is_none());
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_entries_below_one_are_rejected() {
        let api = MockGameApi::default();
        let (service, _) = service_with(&api);
        let start = service
            .start_game(&running_session(), new_game(dec!(25), 1))
            .await
            .unwrap();

        let err = service.update_entries(&start.game, "br-1", 0).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    // ==================== Completion ====================

    #[tokio::test]
    async fn test_complete_game_profit_and_increase() {
        let api = MockGameApi::default();
        let (service, sink) = service_with(&api);
        let start = service
            .start_game(&running_session(), new_game(dec!(50), 2))
            .await
            .unwrap();

        let completion = service
            .complete_game(&start.game, "br-1", dec!(180))
            .await
            .unwrap();

        assert_eq!(completion.net_profit, dec!(80));
        assert_eq!(completion.bankroll_increase, dec!(180));
        assert_eq!(completion.game.status, GameStatus::Completed);
        let adjustment = completion.adjustment.unwrap();
        assert_eq!(adjustment.amount, dec!(180));
        assert_eq!(adjustment.source, AdjustmentSource::GameComplete);
        let amounts: Vec<Decimal> = adjustments(&sink).iter().map(|a| a.amount).collect();
        assert_eq!(amounts, vec![dec!(-100), dec!(180)]);
    }

    #[tokio::test]
    async fn test_bust_game_loses_investment() {
        let api = MockGameApi::default();
        let (service, sink) = service_with(&api);
        let start = service
            .start_game(&running_session(), new_game(dec!(30), 3))
            .await
            .unwrap();
        sink.clear();

        let completion = service.bust_game(&start.game, "br-1").await.unwrap();

        assert_eq!(completion.net_profit, dec!(-90));
        assert_eq!(completion.bankroll_increase, Decimal::ZERO);
        assert!(completion.adjustment.is_none());
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_negative_winnings_rejected() {
        let api = MockGameApi::default();
        let (service, _) = service_with(&api);
        let start = service
            .start_game(&running_session(), new_game(dec!(30), 1))
            .await
            .unwrap();

        let err = service
            .complete_game(&start.game, "br-1", dec!(-1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_and_update() {
        let api = MockGameApi::default();
        let (service, _) = service_with(&api);
        let start = service
            .start_game(&running_session(), new_game(dec!(30), 1))
            .await
            .unwrap();

        let renamed = service
            .update(
                &start.game.id,
                GameUpdate {
                    name: Some("Bounty".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Bounty");
        assert_eq!(service.list_for_session("s-1").await.unwrap().len(), 1);
        assert!(service.list_for_session("s-2").await.unwrap().is_empty());
    }

    // ==================== Models ====================

    #[test]
    fn test_game_decodes_with_null_winnings_and_string_amounts() {
        let json = r#"{
            "id": 5,
            "session_id": 9,
            "name": "Turbo",
            "type": "sitandgo",
            "buy_in": "22.00",
            "entries": 2,
            "winnings": null,
            "status": "running"
        }"#;
        let game: Game = serde_json::from_str(json).unwrap();
        assert_eq!(game.game_type, GameType::Sitandgo);
        assert_eq!(game.total_investment(), dec!(44));
        assert_eq!(game.net_result(), dec!(-44));
        assert!(game.is_running());
    }

    #[test]
    fn test_missing_entries_count_as_one() {
        let game: Game =
            serde_json::from_str(r#"{"id": "g", "buy_in": 10, "entries": null}"#).unwrap();
        assert_eq!(game.effective_entries(), 1);
        assert_eq!(game.total_investment(), dec!(10));
    }

    #[test]
    fn test_new_game_body_sends_numbers() {
        let json = serde_json::to_value(new_game(dec!(50), 2)).unwrap();
        assert_eq!(json["buy_in"], serde_json::json!(50.0));
        assert_eq!(json["entries"], 2);
        assert_eq!(json["type"], "mtt");
    }

    #[test]
    fn test_game_type_parses_user_spellings() {
        assert_eq!("cash-game".parse::<GameType>(), Ok(GameType::Cashgame));
        assert_eq!("Sit and Go".parse::<GameType>(), Ok(GameType::Sitandgo));
        assert!("bingo".parse::<GameType>().is_err());
    }
}
