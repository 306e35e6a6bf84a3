use super::*;

#[test]
fn test_profile_missing_address_is_fully_keyed() {
    let json = r#"{"personalInfo": {"firstName": "Jane"}}"#;
    let profile: Profile = serde_json::from_str(json).unwrap();
    assert_eq!(profile.personal_info.first_name, "Jane");
    assert_eq!(profile.personal_info.address.street, "");
    assert_eq!(profile.personal_info.address.zip_code, "");

    let back = serde_json::to_value(&profile).unwrap();
    let address = &back["personalInfo"]["address"];
    for key in ["street", "city", "state", "zipCode", "country"] {
        assert!(address.get(key).is_some(), "missing key {}", key);
    }
}

#[test]
fn test_profile_partial_address() {
    let json = r#"{"personalInfo": {"address": {"city": "Leeds"}}}"#;
    let profile: Profile = serde_json::from_str(json).unwrap();
    assert_eq!(profile.personal_info.address.city, "Leeds");
    assert_eq!(profile.personal_info.address.state, "");
}

#[test]
fn test_profile_is_empty() {
    let mut profile = Profile::default();
    assert!(profile.is_empty());
    profile.work_info.skills.push("Rust".to_string());
    assert!(!profile.is_empty());
}

#[test]
fn test_full_name() {
    let mut profile = Profile::default();
    profile.personal_info.first_name = "Jane".to_string();
    assert_eq!(profile.full_name(), "Jane");
    profile.personal_info.last_name = "Doe".to_string();
    assert_eq!(profile.full_name(), "Jane Doe");
}

#[test]
fn test_cv_extension() {
    let mut cv = CvRecord {
        file_name: "Jane_Doe.CV.PDF".to_string(),
        mime_type: "application/pdf".to_string(),
        size_bytes: 10,
        data: String::new(),
        extracted_text: None,
        extraction_confidence: None,
        uploaded_at: None,
    };
    assert_eq!(cv.extension().as_deref(), Some("pdf"));
    cv.file_name = "resume".to_string();
    assert!(cv.extension().is_none());
}

#[test]
fn test_extracted_profile_defaults() {
    let data: ExtractedProfileData = serde_json::from_str("{}").unwrap();
    assert!(data.personal_info.first_name.is_none());
    assert!(data.skills.is_empty());
    assert_eq!(data.confidence.skills, 0.0);
}
