// dose/tests.rs
// Reference doses, ceilings, error paths and label parsing

mod reference_doses {
    use crate::dose::*;

    fn tables() -> &'static DoseTables {
        DoseTables::builtin()
    }

    #[test]
    fn lidocaine_two_percent_seventy_kg() {
        let r = compute_max_dose(tables(), &DoseRequest::new(DrugSalt::Lidocaina, "2%", 70.0)).unwrap();
        assert!((r.max_dose_mg - 490.0).abs() < 1e-9);
        assert!((r.volume_ml - 24.5).abs() < 1e-9);
        assert_eq!(r.max_cartridges, 13);
        assert_eq!(r.vasoconstrictor_ceiling, None);
    }

    #[test]
    fn heavy_patient_is_clamped_to_80_kg_and_absolute_cap() {
        let r = compute_max_dose(tables(), &DoseRequest::new(DrugSalt::Lidocaina, "2%", 90.0)).unwrap();
        assert_eq!(r.effective_weight_kg, 80.0);
        assert!((r.max_dose_mg - 500.0).abs() < 1e-9);
        assert_eq!(r.max_cartridges, 13);
    }

    #[test]
    fn bupivacaine_with_epinephrine_in_cardiac_patient() {
        let req = DoseRequest::new(DrugSalt::Bupivacaina, "0.5%", 70.0)
            .with_vasoconstrictor(Vasoconstrictor::Epinephrine1To200000, AsaClass::IIIOrIV);
        let r = compute_max_dose(tables(), &req).unwrap();
        assert!((r.max_dose_mg - 90.0).abs() < 1e-9);
        assert_eq!(r.dose_limited_cartridges, 10);
        assert_eq!(r.vasoconstrictor_ceiling, Some(4));
        assert_eq!(r.max_cartridges, 4);
    }

    #[test]
    fn eighteen_ml_is_exactly_ten_cartridges() {
        // 90 mg / 5 mg/mL = 18 mL = exactly 10 cartridges
        let r = compute_max_dose(tables(), &DoseRequest::new(DrugSalt::Bupivacaina, "0.5%", 70.0)).unwrap();
        assert_eq!(r.max_cartridges, 10);
    }

    #[test]
    fn felypressin_has_no_ceiling_for_healthy_patients() {
        let healthy = DoseRequest::new(DrugSalt::Prilocaina, "3%", 60.0)
            .with_vasoconstrictor(Vasoconstrictor::Felypressin, AsaClass::IOrII);
        let r = compute_max_dose(tables(), &healthy).unwrap();
        assert!((r.max_dose_mg - 480.0).abs() < 1e-9);
        assert_eq!(r.vasoconstrictor_ceiling, None);
        assert_eq!(r.max_cartridges, 8);

        let cardiac = DoseRequest::new(DrugSalt::Prilocaina, "3%", 60.0)
            .with_vasoconstrictor(Vasoconstrictor::Felypressin, AsaClass::IIIOrIV);
        let r = compute_max_dose(tables(), &cardiac).unwrap();
        assert_eq!(r.vasoconstrictor_ceiling, Some(5));
        assert_eq!(r.max_cartridges, 5);
    }

    #[test]
    fn ceiling_above_dose_count_leaves_it_alone() {
        let req = DoseRequest::new(DrugSalt::Articaina, "4%", 70.0)
            .with_vasoconstrictor(Vasoconstrictor::Epinephrine1To100000, AsaClass::IOrII);
        let r = compute_max_dose(tables(), &req).unwrap();
        assert_eq!(r.dose_limited_cartridges, 6);
        assert_eq!(r.vasoconstrictor_ceiling, Some(11));
        assert_eq!(r.max_cartridges, 6);
    }

    #[test]
    fn tiny_patient_gets_a_zero_result_not_an_error() {
        let r = compute_max_dose(tables(), &DoseRequest::new(DrugSalt::Lidocaina, "2%", 0.5)).unwrap();
        assert_eq!(r.max_cartridges, 0);
        assert!((r.max_dose_mg - 3.5).abs() < 1e-9);
    }

    #[test]
    fn zero_weight_is_a_zero_dose() {
        let r = compute_max_dose(tables(), &DoseRequest::new(DrugSalt::Lidocaina, "2%", 0.0)).unwrap();
        assert_eq!(r.effective_weight_kg, 0.0);
        assert_eq!(r.max_dose_mg, 0.0);
        assert_eq!(r.volume_ml, 0.0);
        assert_eq!(r.max_cartridges, 0);
    }

    #[test]
    fn cartridges_are_a_plain_floor() {
        // 24.5 mL / 1.8 = 13.6
        let r = compute_max_dose(tables(), &DoseRequest::new(DrugSalt::Lidocaina, "2%", 70.0)).unwrap();
        assert_eq!(r.dose_limited_cartridges, (r.volume_ml / 1.8).floor() as u32);
        assert_eq!(r.dose_limited_cartridges, 13);
    }

    #[test]
    fn notes_follow_salt_and_ingredient() {
        let req = DoseRequest::new(DrugSalt::Prilocaina, "4%", 50.0)
            .with_vasoconstrictor(Vasoconstrictor::Felypressin, AsaClass::IOrII);
        let r = compute_max_dose(tables(), &req).unwrap();
        assert!(r.drug_note.contains("metemoglobinemia"));
        assert!(r.vasoconstrictor_note.starts_with("Felipressina"));

        let r = compute_max_dose(tables(), &DoseRequest::new(DrugSalt::Mepivacaina, "3%", 50.0)).unwrap();
        assert!(r.vasoconstrictor_note.starts_with("Sem vasoconstritor"));
    }
}

mod errors {
    use crate::dose::*;
    use std::collections::HashMap;

    #[test]
    fn unknown_salt_label() {
        let err = compute_max_dose_by_label(DoseTables::builtin(), "unknown", "2%", 70.0, None, None).unwrap_err();
        assert_eq!(
            err,
            DoseError::UnknownSaltOrConcentration {
                salt: "unknown".to_string(),
                concentration: None
            }
        );
    }

    #[test]
    fn concentration_not_offered_for_salt() {
        let err = compute_max_dose(DoseTables::builtin(), &DoseRequest::new(DrugSalt::Lidocaina, "3%", 70.0))
            .unwrap_err();
        assert!(matches!(
            err,
            DoseError::UnknownSaltOrConcentration { concentration: Some(ref c), .. } if c == "3%"
        ));
    }

    #[test]
    fn salt_missing_from_custom_tables() {
        let tables = DoseTables::new(HashMap::new(), HashMap::new()).unwrap();
        let err = compute_max_dose(&tables, &DoseRequest::new(DrugSalt::Articaina, "4%", 70.0)).unwrap_err();
        assert!(matches!(err, DoseError::UnknownSaltOrConcentration { .. }));
    }

    #[test]
    fn vasoconstrictor_requires_asa_class() {
        let err = compute_max_dose_by_label(
            DoseTables::builtin(),
            "lidocaina",
            "2%",
            70.0,
            Some("1:100000 epinefrina"),
            None,
        )
        .unwrap_err();
        assert_eq!(err, DoseError::AsaClassRequired(Vasoconstrictor::Epinephrine1To100000));
    }

    #[test]
    fn negative_or_non_finite_weight_is_rejected() {
        for w in [-10.0, -0.1, f64::NAN, f64::INFINITY] {
            let err = compute_max_dose(DoseTables::builtin(), &DoseRequest::new(DrugSalt::Lidocaina, "2%", w));
            assert!(matches!(err, Err(DoseError::InvalidWeight(_))), "weight {}", w);
        }
    }

    #[test]
    fn missing_ceiling_row_is_a_configuration_error() {
        let mut salts = HashMap::new();
        salts.insert(
            DrugSalt::Articaina,
            SaltLimits {
                mg_per_kg: 7.0,
                absolute_max_mg: Some(500.0),
                concentrations: vec![("4%".to_string(), 40.0)],
            },
        );
        let tables = DoseTables::new(salts, HashMap::new()).unwrap();

        let with_vaso = DoseRequest::new(DrugSalt::Articaina, "4%", 70.0)
            .with_vasoconstrictor(Vasoconstrictor::Epinephrine1To50000, AsaClass::IIIOrIV);
        assert!(matches!(
            compute_max_dose(&tables, &with_vaso),
            Err(DoseError::Misconfigured(_))
        ));

        // Without a vasoconstrictor no ceiling row is consulted.
        let plain = compute_max_dose(&tables, &DoseRequest::new(DrugSalt::Articaina, "4%", 70.0)).unwrap();
        assert_eq!(plain.max_cartridges, 6);
    }

    #[test]
    fn zero_mg_per_ml_is_a_configuration_error() {
        let mut salts = HashMap::new();
        salts.insert(
            DrugSalt::Lidocaina,
            SaltLimits {
                mg_per_kg: 7.0,
                absolute_max_mg: Some(500.0),
                concentrations: vec![("2%".to_string(), 0.0)],
            },
        );
        assert!(matches!(
            DoseTables::new(salts, HashMap::new()),
            Err(DoseError::Misconfigured(_))
        ));
    }

    #[test]
    fn builtin_tables_validate() {
        assert_eq!(DoseTables::builtin().validate(), Ok(()));
    }
}

mod labels {
    use crate::dose::*;

    #[test]
    fn salts_parse_with_accents() {
        assert_eq!("Lidocaína".parse::<DrugSalt>().unwrap(), DrugSalt::Lidocaina);
        assert_eq!("BUPIVACAINA".parse::<DrugSalt>().unwrap(), DrugSalt::Bupivacaina);
        assert!("benzocaina".parse::<DrugSalt>().is_err());
    }

    #[test]
    fn vasoconstrictor_labels() {
        for v in Vasoconstrictor::ALL {
            assert_eq!(v.label().parse::<Vasoconstrictor>().unwrap(), v);
        }
        assert_eq!(
            "1:200.000 Epinefrina".parse::<Vasoconstrictor>().unwrap(),
            Vasoconstrictor::Epinephrine1To200000
        );
        assert!(matches!(
            "adrenalina".parse::<Vasoconstrictor>(),
            Err(DoseError::UnknownVasoconstrictor(_))
        ));
        assert_eq!(Vasoconstrictor::Norepinephrine1To30000.ingredient(), ActiveIngredient::Norepinephrine);
    }

    #[test]
    fn asa_classes() {
        assert_eq!("ASA III/IV".parse::<AsaClass>().unwrap(), AsaClass::IIIOrIV);
        assert_eq!("asa ii".parse::<AsaClass>().unwrap(), AsaClass::IOrII);
        assert_eq!("4".parse::<AsaClass>().unwrap(), AsaClass::IIIOrIV);
        assert!("ASA V".parse::<AsaClass>().is_err());
    }

    #[test]
    fn decimal_comma_concentration() {
        let r = compute_max_dose_by_label(
            DoseTables::builtin(),
            "bupivacaína",
            "0,5 %",
            70.0,
            Some("1:200000 epinefrina"),
            Some("ASA III/IV"),
        )
        .unwrap();
        assert_eq!(r.max_cartridges, 4);
        assert_eq!(DoseTables::builtin().concentrations(DrugSalt::Mepivacaina), vec!["2%", "3%"]);
    }
}
