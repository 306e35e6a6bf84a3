use super::*;
use formpilot_document_html::HtmlDocument;

const PAGE: &str = r#"
<html><body><form>
  <label for="cv">Upload your resume / CV</label>
  <input id="cv" type="file" name="resume" accept=".pdf,.docx" data-max-size="5MB">
  <input id="letter" type="file" name="cover_letter_file">
  <input id="portfolio" type="file" name="work" aria-label="Portfolio">
  <input id="docs" type="file" name="attachment" accept="application/pdf">
  <input id="misc" type="file" name="attachment2">
  <input id="off" type="file" name="resume2" disabled>
  <input id="text" name="resume_text">
</form></body></html>
"#;

fn classifier() -> UploadClassifier {
    UploadClassifier::new(ClassifierTables::builtin(), TextCaps::default())
}

fn mapping_for(id: &str) -> FileUploadMapping {
    let doc = HtmlDocument::parse(PAGE);
    let el = doc.find_by_id(id).unwrap();
    classifier().classify_element(&doc, el)
}

fn cv(mime_type: &str, size_bytes: u64) -> CvRecord {
    CvRecord {
        file_name: "cv.pdf".to_string(),
        mime_type: mime_type.to_string(),
        size_bytes,
        data: String::new(),
        extracted_text: None,
        extraction_confidence: None,
        uploaded_at: None,
    }
}

#[test]
fn test_discover_only_enabled_file_inputs() {
    let doc = HtmlDocument::parse(PAGE);
    let found = classifier().discover(&doc);
    assert_eq!(found.len(), 5);
    assert!(!found.contains(&doc.find_by_id("off").unwrap()));
    assert!(!found.contains(&doc.find_by_id("text").unwrap()));
}

#[test]
fn test_cv_purpose_and_constraints() {
    let mapping = mapping_for("cv");
    assert_eq!(mapping.purpose, UploadPurpose::CvResume);
    assert!(mapping.confidence > 0.9);
    assert_eq!(mapping.accepted_types, vec![".pdf", ".docx"]);
    assert_eq!(mapping.max_size_bytes, Some(5 * 1024 * 1024));
}

#[test]
fn test_other_purposes() {
    assert_eq!(mapping_for("letter").purpose, UploadPurpose::CoverLetter);
    assert_eq!(mapping_for("portfolio").purpose, UploadPurpose::Portfolio);
}

#[test]
fn test_document_accept_without_keyword_is_low_confidence_cv() {
    let mapping = mapping_for("docs");
    assert_eq!(mapping.purpose, UploadPurpose::CvResume);
    assert_eq!(mapping.confidence, 0.4);
}

#[test]
fn test_unknown_purpose() {
    let mapping = mapping_for("misc");
    assert_eq!(mapping.purpose, UploadPurpose::Other);
    assert!(mapping.accepted_types.is_empty());
    assert_eq!(mapping.max_size_bytes, None);
}

#[test]
fn test_parse_accept() {
    assert_eq!(
        parse_accept(" .PDF, application/msword ,, image/*"),
        vec![".pdf", "application/msword", "image/*"]
    );
    assert!(parse_accept("").is_empty());
}

#[test]
fn test_parse_max_size() {
    assert_eq!(parse_max_size("1048576"), Some(1_048_576));
    assert_eq!(parse_max_size("512 KB"), Some(512 * 1024));
    assert_eq!(parse_max_size("1.5MB"), Some(1_572_864));
    assert_eq!(parse_max_size("2g"), Some(2 * 1024 * 1024 * 1024));
    assert_eq!(parse_max_size("big"), None);
    assert_eq!(parse_max_size("5 parsecs"), None);
}

#[test]
fn test_mime_for_extension() {
    assert_eq!(mime_for_extension(".PDF"), Some("application/pdf"));
    assert_eq!(mime_for_extension("doc"), Some("application/msword"));
    assert_eq!(mime_for_extension("txt"), None);
}

#[test]
fn test_doc_cv_rejected_by_pdf_docx_accept() {
    let mapping = mapping_for("cv");
    let err = check_compatibility(&mapping, &cv("application/msword", 1000)).unwrap_err();
    assert!(matches!(err, Incompatibility::UnsupportedType { .. }));
    let message = err.to_string();
    assert!(message.contains(".pdf"));
    assert!(message.contains(".docx"));
}

#[test]
fn test_compatible_pdf() {
    let mapping = mapping_for("cv");
    assert_eq!(check_compatibility(&mapping, &cv("application/pdf", 1000)), Ok(()));
}

#[test]
fn test_too_large() {
    let mapping = mapping_for("cv");
    let err = check_compatibility(&mapping, &cv("application/pdf", 6 * 1024 * 1024)).unwrap_err();
    assert!(matches!(err, Incompatibility::TooLarge { .. }));
}

#[test]
fn test_exact_mime_and_wildcard() {
    let mut mapping = mapping_for("misc");
    mapping.accepted_types = vec!["application/pdf".to_string()];
    assert!(check_compatibility(&mapping, &cv("application/pdf", 1)).is_ok());
    mapping.accepted_types = vec!["application/*".to_string()];
    assert!(check_compatibility(&mapping, &cv("application/msword", 1)).is_ok());
    mapping.accepted_types = vec!["image/*".to_string()];
    assert!(check_compatibility(&mapping, &cv("application/pdf", 1)).is_err());
}

#[test]
fn test_unconstrained_upload_accepts_anything() {
    let mapping = mapping_for("misc");
    assert!(check_compatibility(&mapping, &cv("text/plain", u64::MAX)).is_ok());
}
