use super::*;
use chrono::TimeZone;
use formpilot_protocols::{ExtractionConfidence, SkillMergeStrategy};

fn existing() -> Profile {
    let mut profile = Profile::default();
    profile.personal_info.last_name = "Doe".to_string();
    profile.personal_info.email = "jane@old.example.com".to_string();
    profile.work_info.title = "Engineer".to_string();
    profile.work_info.experience = "Rust".to_string();
    profile.work_info.skills = vec!["Rust".to_string()];
    profile
}

fn extracted() -> ExtractedProfileData {
    let mut data = ExtractedProfileData::default();
    data.personal_info.first_name = Some("Jane".to_string());
    data.personal_info.last_name = Some("Smith".to_string());
    data.personal_info.email = Some("jane@new.example.com".to_string());
    data.personal_info.phone = Some("+1 555 0100".to_string());
    data.personal_info.address.city = Some("Springfield".to_string());
    data.work_info.title = Some("Senior Software Engineer".to_string());
    data.work_info.experience = Some("Ten years of Rust and distributed systems".to_string());
    data.skills = vec!["rust".to_string(), "Tokio".to_string()];
    data.confidence = ExtractionConfidence {
        personal_info: 0.9,
        work_info: 0.8,
        education: 0.5,
        skills: 0.7,
    };
    data
}

fn policy(personal: FieldMergeStrategy, work: FieldMergeStrategy) -> MergePolicy {
    MergePolicy {
        personal_info: personal,
        work_info: work,
        ..MergePolicy::default()
    }
}

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
}

#[test]
fn test_preserve_existing_fills_empty_first_name() {
    let mut profile = Profile::default();
    profile.personal_info.first_name = String::new();
    let mut data = ExtractedProfileData::default();
    data.personal_info.first_name = Some("Jane".to_string());

    let outcome = merge(&profile, &data, &MergePolicy::default());
    assert_eq!(outcome.profile.personal_info.first_name, "Jane");
}

#[test]
fn test_preserve_existing_never_changes_filled_fields() {
    let before = existing();
    let outcome = merge_at(
        &before,
        &extracted(),
        &policy(FieldMergeStrategy::PreserveExisting, FieldMergeStrategy::PreserveExisting),
        at(),
    );
    let after = &outcome.profile;
    assert_eq!(after.personal_info.last_name, "Doe");
    assert_eq!(after.personal_info.email, "jane@old.example.com");
    assert_eq!(after.work_info.title, "Engineer");
    assert_eq!(after.work_info.experience, "Rust");
    assert_eq!(after.personal_info.first_name, "Jane");
    assert_eq!(after.personal_info.address.city, "Springfield");
}

#[test]
fn test_prefer_extracted_overwrites_without_preservation() {
    let mut policy = policy(FieldMergeStrategy::PreferExtracted, FieldMergeStrategy::PreferExtracted);
    policy.preserve_user_modifications = false;
    let outcome = merge_at(&existing(), &extracted(), &policy, at());
    assert_eq!(outcome.profile.personal_info.last_name, "Smith");
    assert_eq!(outcome.profile.personal_info.email, "jane@new.example.com");
    assert_eq!(outcome.profile.work_info.title, "Senior Software Engineer");
}

#[test]
fn test_prefer_extracted_respects_user_modifications() {
    let policy = policy(FieldMergeStrategy::PreferExtracted, FieldMergeStrategy::PreferExtracted);
    assert!(policy.preserve_user_modifications);
    let outcome = merge_at(&existing(), &extracted(), &policy, at());
    assert_eq!(outcome.profile.personal_info.last_name, "Doe");
    assert_eq!(outcome.profile.personal_info.first_name, "Jane");
}

#[test]
fn test_invalid_email_is_never_taken() {
    let mut data = extracted();
    data.personal_info.email = Some("not-an-email".to_string());
    let mut policy = policy(FieldMergeStrategy::PreferExtracted, FieldMergeStrategy::PreferExtracted);
    policy.preserve_user_modifications = false;
    let outcome = merge_at(&existing(), &data, &policy, at());
    assert_eq!(outcome.profile.personal_info.email, "jane@old.example.com");

    let empty = Profile::default();
    let outcome = merge_at(&empty, &data, &MergePolicy::default(), at());
    assert_eq!(outcome.profile.personal_info.email, "");
}

#[test]
fn test_merge_intelligent() {
    let outcome = merge_at(
        &existing(),
        &extracted(),
        &policy(FieldMergeStrategy::MergeIntelligent, FieldMergeStrategy::MergeIntelligent),
        at(),
    );
    let after = &outcome.profile;
    // "Smith" is more than 20% longer than "Doe".
    assert_eq!(after.personal_info.last_name, "Smith");
    assert_eq!(after.work_info.title, "Senior Software Engineer");
    // Free text keeps the longer value.
    assert_eq!(after.work_info.experience, "Ten years of Rust and distributed systems");
    // Both emails valid: the stored one stays.
    assert_eq!(after.personal_info.email, "jane@old.example.com");
}

#[test]
fn test_skills_merged_with_default_policy() {
    let outcome = merge_at(&existing(), &extracted(), &MergePolicy::default(), at());
    assert_eq!(outcome.profile.work_info.skills, vec!["Rust", "Tokio"]);
}

#[test]
fn test_skills_replace() {
    let policy = MergePolicy {
        skills: SkillMergeStrategy::Replace,
        ..MergePolicy::default()
    };
    let outcome = merge_at(&existing(), &extracted(), &policy, at());
    assert_eq!(outcome.profile.work_info.skills, vec!["rust", "Tokio"]);
}

#[test]
fn test_stamps_last_updated_and_leaves_input_alone() {
    let before = existing();
    let outcome = merge_at(&before, &ExtractedProfileData::default(), &MergePolicy::default(), at());
    assert_eq!(outcome.profile.last_updated, Some(at()));
    assert_eq!(before.last_updated, None);
    assert!(!outcome.changed());
}

#[test]
fn test_changes_are_reported() {
    let outcome = merge_at(&existing(), &extracted(), &MergePolicy::default(), at());
    let paths: Vec<&str> = outcome.changes.iter().map(|c| c.path.as_str()).collect();
    assert!(paths.contains(&"personalInfo.firstName"));
    assert!(paths.contains(&"personalInfo.address.city"));
    assert!(paths.contains(&"workInfo.skills"));
    assert!(!paths.contains(&"personalInfo.lastName"));

    let first = outcome
        .changes
        .iter()
        .find(|c| c.path == "personalInfo.firstName")
        .unwrap();
    assert_eq!(first.from, "");
    assert_eq!(first.to, "Jane");
}

#[test]
fn test_low_confidence_categories_are_ignored() {
    let policy = MergePolicy {
        min_confidence: 0.85,
        ..MergePolicy::default()
    };
    let outcome = merge_at(&Profile::default(), &extracted(), &policy, at());
    assert_eq!(outcome.profile.personal_info.first_name, "Jane");
    assert_eq!(outcome.profile.work_info.title, "");
    assert!(outcome.profile.work_info.skills.is_empty());
}

#[test]
fn test_extracted_values_are_trimmed() {
    let mut data = ExtractedProfileData::default();
    data.personal_info.first_name = Some("  Jane  ".to_string());
    data.personal_info.last_name = Some("   ".to_string());
    let outcome = merge_at(&Profile::default(), &data, &MergePolicy::default(), at());
    assert_eq!(outcome.profile.personal_info.first_name, "Jane");
    assert_eq!(outcome.profile.personal_info.last_name, "");
}

#[test]
fn test_address_stays_fully_keyed() {
    let outcome = merge_at(&Profile::default(), &extracted(), &MergePolicy::default(), at());
    let json = serde_json::to_value(&outcome.profile).unwrap();
    let address = &json["personalInfo"]["address"];
    for key in ["street", "city", "state", "zipCode", "country"] {
        assert!(address.get(key).is_some(), "{key}");
    }
}
