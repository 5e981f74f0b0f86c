use chrono::{NaiveDate, TimeZone, Utc};
use civreg_core::{
    BirthFields, BirthRecord, Certify, DeathFields, DeathRecord, Record, RecordId,
};

#[test]
fn birth_certificate_carries_numbers_and_formatted_fields() {
    let mut fields = BirthFields::new("Asha", "Nair", date(2024, 1, 5));
    fields.middle_name = "K".to_string();
    fields.gender = "female".to_string();
    fields.time_hour = "08".to_string();
    fields.time_min = "15".to_string();
    fields.time_sec = "00".to_string();
    fields.birth_weight = "3.2".to_string();
    fields.mode_of_birth = "natural".to_string();
    let record = BirthRecord::from_parts(
        RecordId::from("1704450000000"),
        Utc.with_ymd_and_hms(2024, 1, 6, 9, 30, 0).unwrap(),
        fields,
    );

    let certificate = record.certificate();
    assert_eq!(certificate.certificate_no, "BC-1704450000000");
    assert_eq!(certificate.sections[0].heading, "CHILD INFORMATION");

    let text = certificate.to_string();
    assert!(text.contains("BIRTH CERTIFICATE"));
    assert!(text.contains("Certificate No: BC-1704450000000"));
    assert!(text.contains("Registration Date: 06 January 2024"));
    assert!(text.contains("Asha K Nair"));
    assert!(text.contains("08:15:00"));
    assert!(text.contains("3.2 kg"));
    assert!(text.contains("Natural"));
    assert!(text.contains("BR-1704450000000"));
    assert!(text.trim_end().ends_with("Registrar's Signature"));
}

#[test]
fn death_certificate_shows_effective_cause() {
    let mut fields = DeathFields::new("Ravi", "Menon", date(1950, 6, 1), date(2024, 2, 10));
    fields.cause_of_death = "other".to_string();
    fields.other_cause = "snake_bite".to_string();
    fields.id_proof_type = "voter_id".to_string();
    let record = DeathRecord::from_parts(
        RecordId::from("d1"),
        Utc.with_ymd_and_hms(2024, 2, 11, 9, 30, 0).unwrap(),
        fields,
    );

    let text = record.certificate().to_string();
    assert!(text.contains("DEATH CERTIFICATE"));
    assert!(text.contains("Certificate No: DC-d1"));
    assert!(text.contains("Snake Bite"));
    assert!(text.contains("Voter Id"));
    assert!(text.contains("10 February 2024"));
    assert!(text.contains("DR-d1"));
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
