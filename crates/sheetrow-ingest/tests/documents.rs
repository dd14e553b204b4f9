//! End-to-end ingestion through the public API

use pretty_assertions::assert_eq;
use sheetrow_ingest::{DocumentSlot, IngestConfig, IngestError, Ingestor};
use sheetrow_model::{CellValue, Document, FieldType};

const PAYLOAD: &str = r#"{
  "valueRanges": [
    {
      "range": "'Enemy Stats'!A1:C5",
      "values": [
        ["id", "name", "val"],
        ["string", "string", "INT"],
        ["A", "x", 1],
        ["", "y", 2],
        ["B", "z"]
      ]
    },
    { "range": "Empty!A1:A1", "values": [["only header"]] },
    { "range": "Unfetched!A1:A1" }
  ]
}"#;

#[test]
fn merges_and_pads_rows() {
    let document = Ingestor::default().ingest(PAYLOAD).unwrap();
    assert_eq!(document.table_names(), vec!["Enemy Stats"]);

    let table = document.table("Enemy Stats").unwrap();
    assert_eq!(table.schema[2].field_type(), FieldType::Int);
    assert_eq!(table.rows.len(), 2);

    let a = &table.rows[0];
    assert_eq!(a.id, "A");
    assert_eq!(a.text("name").as_deref(), Some("x|y"));
    assert_eq!(a.text("val").as_deref(), Some("1|2"));
    assert_eq!(a.get("val").map(CellValue::display), Some("1, 2".to_string()));

    let b = &table.rows[1];
    assert_eq!(b.text("val").as_deref(), Some(""));
}

#[test]
fn document_survives_json_round_trip() {
    let document = Ingestor::new(IngestConfig::new().with_default_group("Balance"))
        .ingest(PAYLOAD)
        .unwrap();
    let restored = Document::from_json(&document.to_json().unwrap()).unwrap();
    assert_eq!(restored, document);
    assert!(restored.groups.iter().any(|g| g == "Balance"));
}

#[test]
fn malformed_payload_keeps_previous_document() {
    let mut slot = DocumentSlot::new(Ingestor::default());
    slot.refresh(PAYLOAD).unwrap();

    let err = slot.refresh(r#"{"sheets": []}"#).unwrap_err();
    assert!(matches!(err, IngestError::UnrecognizedEnvelope { .. }));
    assert!(slot.document().unwrap().table("Enemy Stats").is_some());
}
