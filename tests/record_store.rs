use chrono::Utc;
use steriscan::{
    Error, Instrument, InstrumentStatus, Kit, Language, RecordStore, ScanResult, Settings,
    Verdict, DATABASE_NAME,
};

fn reference_kit() -> Kit {
    Kit::new(
        "Boîte de césarienne",
        "Composition de référence",
        vec![
            Instrument::expected("INST-001", "Ciseaux de Mayo", "scissors"),
            Instrument::expected("INST-002", "Pince Hémostatique", "clamp"),
            Instrument::expected("INST-003", "Scalpel #10", "scalpel"),
        ],
        true,
    )
}

#[tokio::test]
async fn records_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("app-data");

    let kit;
    let scan;
    let settings = Settings {
        language: Language::Sw,
        offline_mode: false,
        sms_alerts: true,
        phone_number: Some("+255700000001".into()),
        auto_save: true,
        ai_confidence_threshold: 0.9,
    };
    {
        let store = RecordStore::in_dir(&data_dir);
        store.initialize().unwrap();
        assert_eq!(store.path(), Some(data_dir.join(DATABASE_NAME).as_path()));

        kit = store.save_kit(reference_kit()).await.unwrap();
        scan = ScanResult {
            id: "scan-durable".into(),
            kit_id: kit.id.clone(),
            image_uri: "file:///captures/durable.jpg".into(),
            detected_instruments: kit
                .instruments
                .iter()
                .cloned()
                .map(|instrument| instrument.with_status(InstrumentStatus::Missing))
                .collect(),
            conformity_score: 0,
            timestamp: Utc::now(),
            status: Verdict::NonConforming,
        };
        store.save_scan_result(&scan).await.unwrap();
        store.update_settings(&settings).await.unwrap();
    }

    let reopened = RecordStore::in_dir(&data_dir);
    reopened.initialize().unwrap();

    assert_eq!(reopened.get_kit(&kit.id).await.unwrap(), Some(kit.clone()));
    assert_eq!(reopened.get_scan_result(&scan.id).await.unwrap(), Some(scan));
    assert_eq!(reopened.list_scan_results_for_kit(&kit.id).await.unwrap().len(), 1);
    // Seeding does not overwrite settings that already exist.
    assert_eq!(reopened.get_settings().await.unwrap(), settings);
    assert_eq!(reopened.list_master_instruments().await.unwrap().len(), 5);
}

#[tokio::test]
async fn every_operation_requires_initialization() {
    let store = RecordStore::in_memory();

    assert!(matches!(store.list_kits().await, Err(Error::StorageNotInitialized)));
    assert!(matches!(store.get_kit("kit-1").await, Err(Error::StorageNotInitialized)));
    assert!(matches!(
        store.save_kit(reference_kit()).await,
        Err(Error::StorageNotInitialized)
    ));
    assert!(matches!(
        store.list_scan_results().await,
        Err(Error::StorageNotInitialized)
    ));
    assert!(matches!(
        store.get_scan_result("scan-1").await,
        Err(Error::StorageNotInitialized)
    ));
    assert!(matches!(store.get_settings().await, Err(Error::StorageNotInitialized)));
    assert!(matches!(
        store.list_master_instruments().await,
        Err(Error::StorageNotInitialized)
    ));
}

#[tokio::test]
async fn clones_share_one_initialized_store() {
    let store = RecordStore::in_memory();
    let clone = store.clone();
    store.initialize().unwrap();

    let kit = clone.save_kit(reference_kit()).await.unwrap();
    assert_eq!(store.get_kit(&kit.id).await.unwrap(), Some(kit));
}

#[tokio::test]
async fn kit_round_trip_preserves_instrument_order() {
    let store = RecordStore::in_memory();
    store.initialize().unwrap();

    let mut kit = reference_kit();
    kit.instruments.reverse();
    let saved = store.save_kit(kit).await.unwrap();

    let loaded = store.get_kit(&saved.id).await.unwrap().unwrap();
    assert_eq!(loaded, saved);
    let ids: Vec<_> = loaded.instruments.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["INST-003", "INST-002", "INST-001"]);
}
