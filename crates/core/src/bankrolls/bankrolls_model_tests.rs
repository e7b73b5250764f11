//! Tests for bankroll domain models.

#[cfg(test)]
mod tests {
    use crate::bankrolls::*;
    use crate::errors::Error;
    use crate::sessions::SessionStatus;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn create_test_bankroll(starting: Decimal, current: Decimal, goal: Option<Decimal>) -> Bankroll {
        Bankroll {
            id: "br-1".to_string(),
            name: "Main".to_string(),
            bankroll_type: BankrollType::Online,
            currency: "USD".to_string(),
            starting_amount: starting,
            current_amount: current,
            goal_amount: goal,
            status: Some("active".to_string()),
            is_archived: false,
            created_at: None,
            updated_at: None,
        }
    }

    fn valid_new_bankroll() -> NewBankroll {
        NewBankroll {
            name: "Live MTT".to_string(),
            bankroll_type: BankrollType::Live,
            currency: "EUR".to_string(),
            starting_amount: dec!(1000),
            goal_amount: Some(dec!(5000)),
            description: None,
        }
    }

    // ==================== Deserialization ====================

    #[test]
    fn test_bankroll_amounts_decode_from_strings_and_numbers() {
        let json = r#"{
            "id": 7,
            "name": "Main",
            "type": "live",
            "currency": "EUR",
            "starting_amount": "1000.00",
            "current_amount": 1250.5,
            "goal_amount": null
        }"#;
        let bankroll: Bankroll = serde_json::from_str(json).unwrap();
        assert_eq!(bankroll.id, "7");
        assert_eq!(bankroll.bankroll_type, BankrollType::Live);
        assert_eq!(bankroll.starting_amount, dec!(1000.00));
        assert_eq!(bankroll.current_amount, dec!(1250.5));
        assert!(bankroll.goal_amount.is_none());
    }

    #[test]
    fn test_bankroll_defaults_for_missing_fields() {
        let bankroll: Bankroll = serde_json::from_str(r#"{"id": "a", "name": "x"}"#).unwrap();
        assert_eq!(bankroll.currency, DEFAULT_CURRENCY);
        assert_eq!(bankroll.bankroll_type, BankrollType::Online);
        assert_eq!(bankroll.current_amount, Decimal::ZERO);
        assert!(!bankroll.is_archived);
    }

    #[test]
    fn test_unknown_bankroll_type_maps_to_other() {
        let bankroll: Bankroll =
            serde_json::from_str(r#"{"id": "a", "name": "x", "type": "crypto"}"#).unwrap();
        assert_eq!(bankroll.bankroll_type, BankrollType::Other);
    }

    #[test]
    fn test_bankroll_type_parsing_excludes_other() {
        assert_eq!("Live".parse::<BankrollType>().unwrap(), BankrollType::Live);
        assert_eq!(" mixed ".parse::<BankrollType>().unwrap(), BankrollType::Mixed);
        assert!("other".parse::<BankrollType>().is_err());
        assert!("crypto".parse::<BankrollType>().is_err());
    }

    // ==================== Derived figures ====================

    #[test]
    fn test_net_profit_and_percentage() {
        let bankroll = create_test_bankroll(dec!(1000), dec!(1250), None);
        assert_eq!(bankroll.net_profit(), dec!(250));
        assert_eq!(bankroll.profit_percentage(), dec!(25));
    }

    #[test]
    fn test_profit_percentage_with_zero_start() {
        let bankroll = create_test_bankroll(Decimal::ZERO, dec!(100), None);
        assert_eq!(bankroll.profit_percentage(), Decimal::ZERO);
    }

    #[test]
    fn test_goal_progress_is_clamped() {
        assert_eq!(
            create_test_bankroll(dec!(1000), dec!(1500), Some(dec!(3000))).goal_progress(),
            Some(dec!(50))
        );
        assert_eq!(
            create_test_bankroll(dec!(1000), dec!(4000), Some(dec!(3000))).goal_progress(),
            Some(dec!(100))
        );
        assert_eq!(
            create_test_bankroll(dec!(1000), dec!(-50), Some(dec!(3000))).goal_progress(),
            Some(Decimal::ZERO)
        );
        assert_eq!(
            create_test_bankroll(dec!(1000), dec!(1500), Some(Decimal::ZERO)).goal_progress(),
            None
        );
        assert_eq!(
            create_test_bankroll(dec!(1000), dec!(1500), None).goal_progress(),
            None
        );
    }

    #[test]
    fn test_with_adjustment_only_touches_matching_bankroll() {
        let bankroll = create_test_bankroll(dec!(1000), dec!(1000), None);
        let adjustment = BankrollAdjustment {
            bankroll_id: "br-1".to_string(),
            amount: dec!(-100),
            source: AdjustmentSource::GameStart,
            game_id: Some("g-1".to_string()),
        };
        assert_eq!(bankroll.with_adjustment(&adjustment).current_amount, dec!(900));

        let other = BankrollAdjustment {
            bankroll_id: "br-2".to_string(),
            ..adjustment
        };
        assert_eq!(bankroll.with_adjustment(&other).current_amount, dec!(1000));
    }

    #[test]
    fn test_apply_adjustment_over_list() {
        let mut second = create_test_bankroll(dec!(500), dec!(500), None);
        second.id = "br-2".to_string();
        let list = vec![create_test_bankroll(dec!(1000), dec!(1000), None), second];
        let adjustment = BankrollAdjustment {
            bankroll_id: "br-2".to_string(),
            amount: dec!(180),
            source: AdjustmentSource::GameComplete,
            game_id: None,
        };
        let adjusted = BankrollService::apply_adjustment(&list, &adjustment);
        assert_eq!(adjusted[0].current_amount, dec!(1000));
        assert_eq!(adjusted[1].current_amount, dec!(680));
    }

    // ==================== Validation ====================

    #[test]
    fn test_new_bankroll_validation_passes() {
        assert!(valid_new_bankroll().validate().is_ok());
    }

    #[test]
    fn test_new_bankroll_validation_collects_all_errors() {
        let new_bankroll = NewBankroll {
            name: "  ".to_string(),
            starting_amount: Decimal::ZERO,
            goal_amount: Some(Decimal::ZERO),
            ..valid_new_bankroll()
        };
        let err = new_bankroll.validate().unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, Error::Validation(_)));
        assert!(message.contains("Bankroll name is required"));
        assert!(message.contains("Starting amount must be greater than 0"));
        assert!(message.contains("Goal amount must be greater than starting amount"));
    }

    #[test]
    fn test_new_bankroll_serializes_amounts_as_numbers() {
        let json = serde_json::to_value(valid_new_bankroll()).unwrap();
        assert_eq!(json["type"], "live");
        assert_eq!(json["starting_amount"], serde_json::json!(1000.0));
        assert_eq!(json["goal_amount"], serde_json::json!(5000.0));
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_bankroll_update_skips_unset_fields() {
        let update = BankrollUpdate {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Renamed"}));
    }

    #[test]
    fn test_bankroll_update_rejects_blank_name() {
        let update = BankrollUpdate {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    // ==================== Session filter ====================

    #[test]
    fn test_session_filter_query_omits_zero_values() {
        let filter = BankrollSessionFilter {
            status: Some(SessionStatus::Completed),
            limit: Some(20),
            offset: Some(0),
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("limit".to_string(), "20".to_string()),
                ("status".to_string(), "completed".to_string()),
            ]
        );
    }
}
