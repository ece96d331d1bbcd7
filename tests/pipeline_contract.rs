//! End-to-end contract tests for the analysis parser and the persisted
//! meeting archive, using the public library API only.

use notulen::analysis::parser::{parse_analysis, UNKNOWN_DEADLINE, UNKNOWN_PERSON};
use notulen::db::{self, meetings::MeetingRepository};
use notulen::meeting::{Meeting, MeetingPhase};

#[test]
fn analysis_result_survives_persistence() {
    let raw = r#"```json
    {
        "summary": "Besproken: offerte en planning.",
        "decisions": [{"text": "Offerte gaat vrijdag de deur uit"}],
        "action_items": [{"text": "Offerte opstellen", "assignee": "Jan"}],
        "follow_ups": [{"text": "Planning herzien"}]
    }
    ```"#;

    let analysis = parse_analysis(raw).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let conn = db::open(&dir.path().join("contract.db")).unwrap();

    let mut meeting = Meeting::new("Weekoverleg".to_string());
    MeetingRepository::insert(&conn, &meeting, None).unwrap();

    meeting.transcript = Some("We besluiten dat de offerte vrijdag de deur uit gaat.".to_string());
    meeting.summary = Some(analysis.summary.clone());
    meeting.decisions = analysis.decisions;
    meeting.action_items = analysis.action_items;
    meeting.follow_ups = analysis.follow_ups;
    meeting.status = MeetingPhase::Done;
    MeetingRepository::update(&conn, &meeting).unwrap();

    let loaded = MeetingRepository::get(&conn, &meeting.id).unwrap().unwrap();
    assert_eq!(loaded.status, MeetingPhase::Done);
    assert_eq!(loaded.summary.as_deref(), Some("Besproken: offerte en planning."));
    assert_eq!(loaded.decisions[0].text, "Offerte gaat vrijdag de deur uit");
    assert_eq!(loaded.action_items[0].assignee, "Jan");
    assert_eq!(loaded.follow_ups[0].deadline, UNKNOWN_DEADLINE);
    assert_eq!(loaded.follow_ups[0].responsible, UNKNOWN_PERSON);

    // Toggle through the repository and verify double-toggle restores state
    let item_id = loaded.action_items[0].id.clone();
    assert_eq!(
        MeetingRepository::toggle_action_item(&conn, &meeting.id, &item_id).unwrap(),
        Some(true)
    );
    assert_eq!(
        MeetingRepository::toggle_action_item(&conn, &meeting.id, &item_id).unwrap(),
        Some(false)
    );
}
