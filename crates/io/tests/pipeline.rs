//! Read real xlsx/docx bytes, unify them and look for duplicates.

use std::io::{Cursor, Write};

use rust_xlsxwriter::Workbook;
use tabmatch_engine::report::Report;
use tabmatch_engine::{analyze, unify, MatchConfig};
use tabmatch_io::{export_report, load_documents, Document, ExportFormat};

fn workbook(rows: &[&[&str]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name("Clients").unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write_string(r as u32, c as u16, *value).unwrap();
        }
    }
    workbook.save_to_buffer().unwrap()
}

fn word_table(rows: &[&[&str]]) -> Vec<u8> {
    let mut body = String::from("<w:tbl>");
    for row in rows {
        body.push_str("<w:tr>");
        for cell in *row {
            body.push_str(&format!("<w:tc><w:p><w:r><w:t>{cell}</w:t></w:r></w:p></w:tc>"));
        }
        body.push_str("</w:tr>");
    }
    body.push_str("</w:tbl>");

    let xml = format!(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

#[test]
fn phone_duplicates_across_xlsx_and_docx() {
    let docs = vec![
        Document::new(
            "clients.xlsx",
            workbook(&[&["Name", "Phone"], &["Ann", "+7-999-123"], &["Bob", "555"]]),
        ),
        Document::new("contract.docx", word_table(&[&["Phone", "City"], &["79991 23", "Riga"]])),
        Document::new("scan.pdf", b"%PDF".to_vec()),
    ];

    let (batches, failures) = load_documents(&docs).into_parts();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].name(), "scan.pdf");

    let table = unify(batches);
    assert_eq!(table.fields(), &["Name", "Phone", "City"]);
    assert_eq!(table.len(), 3);

    let config = MatchConfig {
        selected_fields: vec!["Phone".into()],
        ..MatchConfig::default()
    };
    let analysis = analyze(&table, &config).unwrap();
    let dupes = analysis.duplicates.as_ref().unwrap();
    assert_eq!(dupes.groups, 1);

    let report = Report::duplicates(&table, &config, &analysis.selection, dupes, false);
    let csv = String::from_utf8(export_report(&report, ExportFormat::Csv).unwrap()).unwrap();
    assert_eq!(
        csv,
        "match_key,group,row_id,provenance,Phone\n\
         7999123,1,0,clients.xlsx (Sheet: Clients),+7-999-123\n\
         7999123,1,2,contract.docx (Table: 1),79991 23\n"
    );
}

#[test]
fn single_row_word_table_is_data() {
    let docs = vec![Document::new("one.docx", word_table(&[&["Ann", "+7-999-123"]]))];
    let (batches, failures) = load_documents(&docs).into_parts();
    assert!(failures.is_empty());

    let table = unify(batches);
    assert_eq!(table.fields(), &["Col_0", "Col_1"]);
    assert_eq!(table.len(), 1);
    assert_eq!(table.value(&table.records()[0], "Col_0").as_str(), "Ann");
}
