//! End-to-end tests for converting single documents.

mod common;

use std::fs;
use std::path::Path;

use common::{DocxBuilder, JPEG, PNG};
use docdown::{convert_file, ConversionOutcome, Docdown, Error};

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_heading_paragraph_and_image() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("in/doc.docx");
    DocxBuilder::new()
        .heading(1, "Intro")
        .paragraph("Hello world")
        .image("rId5", "image1.png", PNG)
        .write_to(&source);
    let out = dir.path().join("out");

    let report = convert_file(&source, &out);

    assert_eq!(report.outcome, ConversionOutcome::Success);
    assert_eq!(report.output.as_deref(), Some(out.join("doc.md").as_path()));
    assert_eq!(
        read(&out.join("doc.md")),
        "# Intro\n\nHello world\n\n![](images/doc_image_1.png)\n\n"
    );
    assert_eq!(fs::read(out.join("images/doc_image_1.png")).unwrap(), PNG);
    assert_eq!(report.images_written, 1);
}

#[test]
fn test_no_images_means_no_images_dir() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("plain.docx");
    DocxBuilder::new()
        .heading(2, "Only text")
        .paragraph("nothing else")
        .write_to(&source);
    let out = dir.path().join("out");

    let report = convert_file(&source, &out);

    assert_eq!(report.outcome, ConversionOutcome::Success);
    assert!(!out.join("images").exists());
    let markdown = read(&out.join("plain.md"));
    assert!(!markdown.contains("!["));
    assert_eq!(markdown, "## Only text\n\nnothing else\n\n");
}

#[test]
fn test_rerun_gives_identical_output() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("doc.docx");
    DocxBuilder::new()
        .paragraph("one")
        .image("rId7", "a.jpeg", JPEG)
        .write_to(&source);
    let out = dir.path().join("out");

    convert_file(&source, &out);
    let first = read(&out.join("doc.md"));
    let first_image = fs::read(out.join("images/doc_image_1.jpg")).unwrap();

    convert_file(&source, &out);
    assert_eq!(read(&out.join("doc.md")), first);
    assert_eq!(fs::read(out.join("images/doc_image_1.jpg")).unwrap(), first_image);
    assert_eq!(fs::read_dir(out.join("images")).unwrap().count(), 1);
}

#[test]
fn test_identical_images_get_distinct_files() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("twins.docx");
    DocxBuilder::new()
        .image("rId1", "image1.png", PNG)
        .image("rId2", "image2.png", PNG)
        .write_to(&source);
    let out = dir.path().join("out");

    let report = convert_file(&source, &out);

    assert_eq!(report.images_written, 2);
    assert_eq!(
        read(&out.join("twins.md")),
        "![](images/twins_image_1.png)\n\n![](images/twins_image_2.png)\n\n"
    );
}

#[test]
fn test_unresolved_reference_is_partial_success() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("broken.docx");
    DocxBuilder::new()
        .paragraph("before")
        .image_ref("rId404")
        .paragraph("after")
        .write_to(&source);
    let out = dir.path().join("out");

    let report = convert_file(&source, &out);

    assert_eq!(
        report.outcome,
        ConversionOutcome::PartialSuccess { warning_count: 1 }
    );
    assert_eq!(read(&out.join("broken.md")), "before\n\n\nafter\n\n");
}

#[test]
fn test_failed_image_write_counts_once() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("doc.docx");
    DocxBuilder::new()
        .paragraph("chart below")
        .image("rId5", "image1.png", PNG)
        .write_to(&source);
    let out = dir.path().join("out");
    // A directory where the image file should go makes the write fail.
    fs::create_dir_all(out.join("images/doc_image_1.png")).unwrap();

    let report = convert_file(&source, &out);

    assert_eq!(report.image_failures.len(), 1);
    assert_eq!(report.image_failures[0].resource_id, "rId5");
    assert_eq!(
        report.outcome,
        ConversionOutcome::PartialSuccess { warning_count: 1 }
    );
    assert_eq!(read(&out.join("doc.md")), "chart below\n\n\n");
}

#[test]
fn test_image_descriptions_as_alt_text() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("fig.docx");
    DocxBuilder::new()
        .image_part("rId5", "image1.png", PNG)
        .described_image_ref("rId5", "Network\ndiagram")
        .write_to(&source);

    let plain = convert_file(&source, dir.path().join("plain"));
    assert_eq!(plain.outcome, ConversionOutcome::Success);
    assert_eq!(
        read(&dir.path().join("plain/fig.md")),
        "![](images/fig_image_1.png)\n\n"
    );

    let described = Docdown::new()
        .with_image_descriptions(true)
        .convert_file(&source, dir.path().join("described"));
    assert_eq!(described.outcome, ConversionOutcome::Success);
    assert_eq!(
        read(&dir.path().join("described/fig.md")),
        "![Network diagram](images/fig_image_1.png)\n\n"
    );
}

#[test]
fn test_orphan_image_is_written_but_not_linked() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("orphan.docx");
    DocxBuilder::new()
        .paragraph("text")
        .image_part("rId3", "unused.png", PNG)
        .write_to(&source);
    let out = dir.path().join("out");

    let report = convert_file(&source, &out);

    assert_eq!(report.outcome, ConversionOutcome::Success);
    assert!(out.join("images/orphan_image_1.png").exists());
    assert_eq!(read(&out.join("orphan.md")), "text\n\n");
}

#[test]
fn test_empty_paragraphs_keep_spacing() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("gaps.docx");
    DocxBuilder::new()
        .paragraph("a")
        .empty_paragraph()
        .paragraph("b")
        .write_to(&source);
    let out = dir.path().join("out");

    convert_file(&source, &out);
    assert_eq!(read(&out.join("gaps.md")), "a\n\n\nb\n\n");
}

#[test]
fn test_empty_body_gives_empty_markdown() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("blank.docx");
    DocxBuilder::new().write_to(&source);
    let out = dir.path().join("out");

    let report = convert_file(&source, &out);

    assert_eq!(report.outcome, ConversionOutcome::Success);
    assert_eq!(read(&out.join("blank.md")), "");
}

#[test]
fn test_unknown_styles_are_paragraphs() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("styles.docx");
    DocxBuilder::new()
        .styled("Title", "Big title")
        .styled("Subtitle", "Smaller")
        .styled("NoSuchStyle", "Plain")
        .heading(9, "Deep")
        .write_to(&source);
    let out = dir.path().join("out");

    convert_file(&source, &out);
    assert_eq!(
        read(&out.join("styles.md")),
        "Big title\n\nSmaller\n\nPlain\n\n###### Deep\n\n"
    );
}

#[test]
fn test_title_as_heading_option() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("title.docx");
    DocxBuilder::new()
        .styled("Title", "Report")
        .heading(3, "Section")
        .write_to(&source);
    let out = dir.path().join("out");

    let report = Docdown::new()
        .with_title_as_heading(true)
        .with_max_heading(2)
        .convert_file(&source, &out);

    assert_eq!(report.outcome, ConversionOutcome::Success);
    assert_eq!(read(&out.join("title.md")), "# Report\n\n## Section\n\n");
}

#[test]
fn test_headings_resolve_without_styles_part() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("nostyles.docx");
    DocxBuilder::new()
        .without_styles()
        .heading(2, "By id")
        .write_to(&source);
    let out = dir.path().join("out");

    convert_file(&source, &out);
    assert_eq!(read(&out.join("nostyles.md")), "## By id\n\n");
}

#[test]
fn test_text_is_not_escaped() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("md.docx");
    DocxBuilder::new()
        .paragraph("a * b _c_ <tag> & [link]")
        .write_to(&source);
    let out = dir.path().join("out");

    convert_file(&source, &out);
    assert_eq!(read(&out.join("md.md")), "a * b _c_ <tag> & [link]\n\n");
}

#[test]
fn test_missing_manifest_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("nomanifest.docx");
    DocxBuilder::new()
        .paragraph("x")
        .without_content_types()
        .write_to(&source);
    let out = dir.path().join("out");

    let report = convert_file(&source, &out);

    assert_eq!(report.failure_kind, Some("corrupt-document"));
    assert!(!out.join("nomanifest.md").exists());
}

#[test]
fn test_main_part_missing_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("dangling.docx");
    DocxBuilder::new()
        .paragraph("x")
        .main_part_target("word/missing.xml")
        .write_to(&source);
    let out = dir.path().join("out");

    let report = convert_file(&source, &out);

    assert_eq!(report.failure_kind, Some("corrupt-document"));
    match &report.outcome {
        ConversionOutcome::Failure { reason } => assert!(reason.contains("word/missing.xml")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(!out.join("dangling.md").exists());
}

#[test]
fn test_non_wordprocessing_main_part_is_unsupported() {
    let data = DocxBuilder::new()
        .paragraph("x")
        .main_content_type("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml")
        .build();

    match docdown::extract(&data) {
        Err(Error::UnsupportedFormat(msg)) => assert!(msg.contains("spreadsheetml")),
        other => panic!("expected unsupported format, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_not_a_package_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("fake.docx");
    fs::write(&source, "just some text").unwrap();
    let out = dir.path().join("out");

    let report = convert_file(&source, &out);

    match &report.outcome {
        ConversionOutcome::Failure { reason } => assert!(reason.contains("Unsupported format")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(report.failure_kind, Some("unsupported-format"));
    assert!(!out.join("fake.md").exists());
}

#[test]
fn test_legacy_doc_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("old.doc");
    let mut data = vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
    data.extend_from_slice(&[0u8; 504]);
    fs::write(&source, data).unwrap();

    let report = convert_file(&source, dir.path().join("out"));
    match &report.outcome {
        ConversionOutcome::Failure { reason } => assert!(reason.contains(".docx")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn test_extract_returns_blocks_and_resources() {
    let data = DocxBuilder::new()
        .heading(1, "T")
        .image("rId9", "pic.png", PNG)
        .image_part("rId10", "extra.jpeg", JPEG)
        .build();

    let (document, resources) = docdown::extract(&data).unwrap().into_parts();

    assert_eq!(document.len(), 2);
    assert_eq!(document.image_references().collect::<Vec<_>>(), vec!["rId9"]);
    let ids: Vec<_> = resources.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["rId9", "rId10"]);
    assert_eq!(resources[1].extension(), "jpg");
}

#[test]
fn test_extract_errors() {
    assert!(matches!(docdown::extract(b""), Err(Error::UnsupportedFormat(_))));
    let no_manifest = DocxBuilder::new().without_content_types().build();
    assert!(matches!(
        docdown::extract(&no_manifest),
        Err(Error::CorruptDocument(_))
    ));
}
