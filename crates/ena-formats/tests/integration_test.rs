//! Integration tests for the ENA metadata and receipt formats.

use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

use ena_formats::xml::parse_document;
use ena_formats::{
    EnaError, SampleMetadataFormat, Stage, StudyMetadataFormat, SubmissionReceiptFormat,
    ValidationLevel, INVALID_RECEIPT_MESSAGE,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

// =============================================================================
// Sample Metadata Tests
// =============================================================================

#[test]
fn test_samples_optional_empty_description_is_valid() {
    let file = create_test_file("alias\ttaxon_id\tdescription\ns1\t9606\t\n");
    let format = SampleMetadataFormat::new(file.path());

    format.validate(ValidationLevel::Min).expect("Validation failed");

    let xml = format.to_xml().expect("Conversion failed");
    let root = parse_document(std::str::from_utf8(&xml).unwrap()).expect("Output is not XML");
    assert_eq!(root.name, "SAMPLE_SET");
    assert_eq!(root.children_named("SAMPLE").count(), 1);
}

#[test]
fn test_samples_missing_taxon_id_column() {
    let file = create_test_file("alias\tdescription\ns1\tfoo\n");
    let err = SampleMetadataFormat::new(file.path())
        .validate(ValidationLevel::Max)
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(
        err.to_string(),
        "Some required sample attributes are missing from the metadata upload file: taxon_id."
    );
}

#[test]
fn test_samples_missing_both_columns_in_required_order() {
    let file = create_test_file("taxon\tname\n9606\tx\n");
    let err = SampleMetadataFormat::new(file.path())
        .validate(ValidationLevel::Max)
        .unwrap_err();

    assert!(err.to_string().ends_with(": alias,taxon_id."));
}

#[test]
fn test_samples_blank_value_names_column_not_row() {
    let file = create_test_file(
        "alias\ttaxon_id\n\
         s1\t9606\n\
         s2\t   \n\
         s3\t10090\n",
    );
    let err = SampleMetadataFormat::new(file.path())
        .validate(ValidationLevel::Max)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Some samples are missing values in the following fields: taxon_id."
    );
}

#[test]
fn test_samples_short_row_counts_as_missing_value() {
    let file = create_test_file("alias\ttaxon_id\ns1\t9606\ns2\n");
    let err = SampleMetadataFormat::new(file.path())
        .validate(ValidationLevel::Max)
        .unwrap_err();

    assert!(err.to_string().contains("taxon_id"));
}

#[test]
fn test_samples_ragged_row_is_format_error() {
    let file = create_test_file("alias\ttaxon_id\ns1\t9606\tunexpected\n");
    let err = SampleMetadataFormat::new(file.path())
        .validate(ValidationLevel::Max)
        .unwrap_err();

    assert!(err.is_format());
}

#[test]
fn test_samples_quoted_cells() {
    let file = create_test_file(
        "alias\ttaxon_id\tdescription\n\
         s1\t9606\t\"Stool, \"\"fresh\"\"\nsecond line\"\n\
         s2\t\"10090\"\tplain\n",
    );
    let format = SampleMetadataFormat::new(file.path());
    let table = format.read().unwrap();

    assert_eq!(table.row_count(), 2);
    assert_eq!(
        table.rows[0].get("description"),
        Some("Stool, \"fresh\"\nsecond line")
    );
    assert_eq!(table.rows[1].get("taxon_id"), Some("10090"));

    let xml = format.to_xml().unwrap();
    let root = parse_document(std::str::from_utf8(&xml).unwrap()).unwrap();
    assert_eq!(
        root.child("SAMPLE").and_then(|s| s.child_text("DESCRIPTION")),
        Some("Stool, \"fresh\"\nsecond line")
    );
}

#[test]
fn test_samples_unterminated_quote_is_format_error() {
    let file = create_test_file(
        "alias\ttaxon_id\tdescription\n\
         s1\t9606\t\"broken\n\
         s2\t10090\tx\n\
         s3\t10090\ty\n",
    );
    let format = SampleMetadataFormat::new(file.path());

    assert!(format.read().unwrap_err().is_format());
    assert!(format.validate(ValidationLevel::Max).unwrap_err().is_format());
    assert!(format.to_xml().unwrap_err().is_format());
}

#[test]
fn test_samples_null_markers_are_missing_values() {
    let file = create_test_file("alias\ttaxon_id\ns1\tNA\ns2\tNaN\n");
    let err = SampleMetadataFormat::new(file.path())
        .validate(ValidationLevel::Max)
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(
        err.to_string(),
        "Some samples are missing values in the following fields: taxon_id."
    );
}

#[test]
fn test_samples_null_marker_optional_value_is_omitted() {
    let file = create_test_file("alias\ttaxon_id\tdescription\ns1\t9606\tN/A\n");
    let xml = SampleMetadataFormat::new(file.path()).to_xml().unwrap();
    let root = parse_document(std::str::from_utf8(&xml).unwrap()).unwrap();

    assert!(root.child("SAMPLE").unwrap().child("DESCRIPTION").is_none());
}

#[test]
fn test_samples_to_xml_fails_on_invalid_input() {
    let file = create_test_file("alias\ttaxon_id\ns1\t\n");
    let err = SampleMetadataFormat::new(file.path()).to_xml().unwrap_err();

    assert!(err.is_validation());
}

#[test]
fn test_samples_xml_content() {
    let file = create_test_file(
        "alias\ttaxon_id\ttitle\tscientific_name\tgeo_loc_name\n\
         s1\t9606\tStool A\tHomo sapiens\tUSA\n\
         s2\t9606\tStool B\tHomo sapiens\t\n",
    );
    let xml = SampleMetadataFormat::new(file.path()).to_xml().unwrap();
    let text = String::from_utf8(xml).unwrap();

    assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));

    let root = parse_document(&text).unwrap();
    let samples: Vec<_> = root.children_named("SAMPLE").collect();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].attribute("alias"), Some("s1"));
    assert_eq!(samples[1].child_text("TITLE"), Some("Stool B"));
    assert!(samples[0].child("SAMPLE_ATTRIBUTES").is_some());
    assert!(samples[1].child("SAMPLE_ATTRIBUTES").is_none());
}

#[test]
fn test_samples_conversion_is_byte_stable() {
    let file = create_test_file("alias\ttaxon_id\tcolor\tsize\ns1\t9606\tred\t3\n");
    let format = SampleMetadataFormat::new(file.path());

    assert_eq!(format.to_xml().unwrap(), format.to_xml().unwrap());
}

#[test]
fn test_samples_pipeline_stages() {
    let file = create_test_file("alias\ttaxon_id\ns1\t9606\n");
    let mut pipeline = SampleMetadataFormat::new(file.path()).pipeline().unwrap();

    assert!(matches!(pipeline.build(), Err(EnaError::InvalidState { .. })));
    pipeline.validate(ValidationLevel::Max).unwrap();
    pipeline.build().unwrap();
    assert_eq!(pipeline.stage(), Stage::Built);
}

// =============================================================================
// Study Metadata Tests
// =============================================================================

#[test]
fn test_study_empty_title_fails() {
    let file = create_test_file("alias\tA1\ntitle\t\n");
    let err = StudyMetadataFormat::new(file.path())
        .validate(ValidationLevel::Max)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "The study is missing values in the following fields: title."
    );
}

#[test]
fn test_study_missing_key() {
    let file = create_test_file("title\tGut study\n");
    let err = StudyMetadataFormat::new(file.path())
        .validate(ValidationLevel::Max)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Some required study attributes are missing from the metadata upload file: alias."
    );
}

#[test]
fn test_study_null_marker_title_fails() {
    let file = create_test_file("alias\tA1\ntitle\tNA\n");
    let err = StudyMetadataFormat::new(file.path())
        .validate(ValidationLevel::Max)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "The study is missing values in the following fields: title."
    );
}

#[test]
fn test_study_unterminated_quote_is_format_error() {
    let file = create_test_file("alias\tA1\ntitle\t\"Gut study\ndescription\tx\n");
    let err = StudyMetadataFormat::new(file.path())
        .validate(ValidationLevel::Max)
        .unwrap_err();

    assert!(err.is_format());
}

#[test]
fn test_study_duplicate_keys_last_wins() {
    let file = create_test_file("alias\tA1\ntitle\tDraft\ntitle\tFinal\n");
    let format = StudyMetadataFormat::new(file.path());

    assert_eq!(format.read().unwrap().get("title"), Some("Final"));

    let xml = format.to_xml().unwrap();
    let root = parse_document(std::str::from_utf8(&xml).unwrap()).unwrap();
    let project = root.child("PROJECT").unwrap();
    assert_eq!(project.child_text("TITLE"), Some("Final"));
}

#[test]
fn test_study_duplicate_key_can_blank_a_value() {
    let file = create_test_file("alias\tA1\ntitle\tDraft\ntitle\t \n");
    let err = StudyMetadataFormat::new(file.path())
        .validate(ValidationLevel::Max)
        .unwrap_err();

    assert!(err.to_string().contains("title"));
}

#[test]
fn test_study_to_xml() {
    let file = create_test_file(
        "alias\tA1\n\
         title\tGut microbiome\n\
         description\tLongitudinal samples\n\
         funding_agency\tNIH\n",
    );
    let xml = StudyMetadataFormat::new(file.path()).to_xml().unwrap();
    let root = parse_document(std::str::from_utf8(&xml).unwrap()).unwrap();

    assert_eq!(root.name, "PROJECT_SET");
    let project = root.child("PROJECT").unwrap();
    assert_eq!(project.attribute("alias"), Some("A1"));
    assert_eq!(project.child_text("DESCRIPTION"), Some("Longitudinal samples"));
    assert_eq!(
        project
            .child("PROJECT_ATTRIBUTES")
            .and_then(|a| a.child("PROJECT_ATTRIBUTE"))
            .and_then(|a| a.child_text("TAG")),
        Some("funding_agency")
    );
}

// =============================================================================
// Receipt Tests
// =============================================================================

#[test]
fn test_receipt_well_formed() {
    let file = create_test_file("<receipt success=\"true\"></receipt>");

    SubmissionReceiptFormat::new(file.path())
        .validate(ValidationLevel::Max)
        .expect("Receipt should be valid");
}

#[test]
fn test_receipt_unclosed_tag() {
    let file = create_test_file("<receipt success=\"true\">");
    let err = SubmissionReceiptFormat::new(file.path())
        .validate(ValidationLevel::Max)
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.to_string(), INVALID_RECEIPT_MESSAGE);
    assert_eq!(err.to_string(), "ENA receipt is not a valid xml form.");
}

#[test]
fn test_receipt_malformed_documents_rejected() {
    let documents = [
        "<a b=\"<\"/>",
        "<1a/>",
        "<a/><?xml version=\"1.0\"?>",
        " <?xml version=\"1.0\"?><a/>",
        "<a>\u{1}</a>",
        "<a><!-- x -- y --></a>",
        "<a b='1'c='2'/>",
        "<a>]]></a>",
        "<a><b></a></b>",
        "<a/><b/>",
        "",
    ];

    for document in documents {
        let file = create_test_file(document);
        let err = SubmissionReceiptFormat::new(file.path())
            .validate(ValidationLevel::Max)
            .unwrap_err();

        assert!(err.is_validation(), "{:?} should be rejected", document);
        assert_eq!(err.to_string(), INVALID_RECEIPT_MESSAGE);
    }
}

#[test]
fn test_receipt_internal_entity_accepted() {
    let file = create_test_file("<!DOCTYPE a [<!ENTITY e \"x\">]><a>&e;</a>");
    let format = SubmissionReceiptFormat::new(file.path());

    format.validate(ValidationLevel::Max).unwrap();
    assert_eq!(format.parse().unwrap().text.as_deref(), Some("x"));
}

#[test]
fn test_receipt_parse_exposes_tree() {
    let file = create_test_file(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <RECEIPT receiptDate=\"2024-05-01T10:00:00\" submissionFile=\"submission.xml\" success=\"true\">\n\
         \x20   <SAMPLE accession=\"ERS0000001\" alias=\"s1\" status=\"PRIVATE\">\n\
         \x20       <EXT_ID accession=\"SAMEA0000001\" type=\"biosample\"/>\n\
         \x20   </SAMPLE>\n\
         \x20   <ACTIONS>ADD</ACTIONS>\n\
         </RECEIPT>\n",
    );
    let root = SubmissionReceiptFormat::new(file.path()).parse().unwrap();

    assert_eq!(root.attribute("success"), Some("true"));
    let sample = root.child("SAMPLE").unwrap();
    assert_eq!(sample.attribute("accession"), Some("ERS0000001"));
    assert!(sample.child("EXT_ID").is_some());
}

// =============================================================================
// Directory Format Tests
// =============================================================================

#[test]
fn test_directory_formats() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("ena_metadata_samples.tsv"),
        "alias\ttaxon_id\ns1\t9606\n",
    )
    .unwrap();
    fs::write(dir.path().join("ena_metadata_study.tsv"), "alias\tA1\ntitle\tT\n").unwrap();
    fs::write(
        dir.path().join("ena_submission_receipt.xml"),
        "<RECEIPT success=\"true\"/>",
    )
    .unwrap();

    SampleMetadataFormat::from_dir(dir.path())
        .validate(ValidationLevel::Max)
        .unwrap();
    StudyMetadataFormat::from_dir(dir.path())
        .validate(ValidationLevel::Max)
        .unwrap();
    SubmissionReceiptFormat::from_dir(dir.path())
        .validate(ValidationLevel::Max)
        .unwrap();
}

#[test]
fn test_directory_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = StudyMetadataFormat::from_dir(dir.path())
        .validate(ValidationLevel::Max)
        .unwrap_err();

    assert!(matches!(err, EnaError::Io { .. }));
}

#[test]
fn test_validation_level_serde() {
    assert_eq!(serde_json::to_string(&ValidationLevel::Min).unwrap(), "\"min\"");
    let level: ValidationLevel = serde_json::from_str("\"max\"").unwrap();
    assert_eq!(level, ValidationLevel::Max);
}
