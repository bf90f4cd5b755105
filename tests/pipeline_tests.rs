//! End-to-end pipeline tests against a real `.xlsx` file on disk.

use flipfolio::{chart_data_for, store, summary_for, FlipfolioError, LocalStore};
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/worksheets/sheet3.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

/// Builds a worksheet part from rows of (reference, is_text, value) cells.
fn worksheet(rows: &[Vec<(&str, bool, &str)>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (index, cells) in rows.iter().enumerate() {
        xml.push_str(&format!("<row r=\"{}\">", index + 1));
        for (reference, is_text, value) in cells {
            if *is_text {
                xml.push_str(&format!("<c r=\"{}\" t=\"str\"><v>{}</v></c>", reference, value));
            } else {
                xml.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", reference, value));
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn sold_flips_part() -> String {
    worksheet(&[
        vec![("A1", true, "2024 flips")],
        vec![
            ("A2", true, "Sold Date"),
            ("B2", true, "Property Sale Price"),
            ("C2", true, "Property Address"),
            ("D2", true, "Property Purchase Price"),
        ],
        vec![
            ("A3", true, "2023-01-05"),
            ("B3", true, "$100,000"),
            ("C3", true, "12 Oak St"),
            ("D3", true, "$80,000"),
        ],
        vec![
            ("A4", true, "2023-02-10"),
            ("B4", true, "$150,000"),
            ("C4", true, "48 Elm Ave"),
            ("D4", true, "($5,000)"),
        ],
    ])
}

fn kiavi_loans_part() -> String {
    // Header sits at spreadsheet row 3; column A has no title and must be
    // discarded as an auto-generated unnamed column.
    worksheet(&[
        vec![("A1", true, "lender export")],
        vec![("A2", true, "generated 2024-06-01")],
        vec![("B3", true, "Address"), ("C3", true, "Total")],
        vec![
            ("A4", true, "stray"),
            ("B4", true, "12 Oak St"),
            ("C4", true, "$1,200.50"),
        ],
        vec![("B5", true, "48 Elm Ave"), ("C5", false, "300")],
    ])
}

fn flip_inventory_part() -> String {
    worksheet(&[
        vec![("A1", true, "inventory")],
        vec![("A2", true, "Address"), ("B2", true, "Lead")],
        vec![("A3", true, "1 Main St"), ("B3", true, "Zillow")],
        vec![("A4", true, "2 Main St"), ("B4", true, "Zillow")],
        vec![("A5", true, "3 Main St"), ("B5", true, "3")],
        vec![("A6", true, "4 Main St"), ("B6", true, "Referral")],
    ])
}

/// Writes a portfolio workbook with the given sheets to `path`.
fn write_workbook(path: &Path, sheets: &[(&str, String)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut archive = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    archive.start_file("[Content_Types].xml", options).unwrap();
    archive.write_all(CONTENT_TYPES.as_bytes()).unwrap();
    archive.start_file("_rels/.rels", options).unwrap();
    archive.write_all(ROOT_RELS.as_bytes()).unwrap();

    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (index, (name, _)) in sheets.iter().enumerate() {
        workbook.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>",
            name,
            index + 1,
            index + 1
        ));
        rels.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet{}.xml\"/>",
            index + 1,
            index + 1
        ));
    }
    workbook.push_str("</sheets></workbook>");
    rels.push_str("</Relationships>");

    archive.start_file("xl/workbook.xml", options).unwrap();
    archive.write_all(workbook.as_bytes()).unwrap();
    archive.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    archive.write_all(rels.as_bytes()).unwrap();
    for (index, (_, part)) in sheets.iter().enumerate() {
        archive
            .start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)
            .unwrap();
        archive.write_all(part.as_bytes()).unwrap();
    }
    archive.finish().unwrap();
}

fn full_portfolio() -> Vec<(&'static str, String)> {
    vec![
        ("Sold Flips", sold_flips_part()),
        ("Kiavi Loans", kiavi_loans_part()),
        ("Flip Inventory Sheet", flip_inventory_part()),
    ]
}

const USER: &str = "user@example.com";

#[test]
fn chart_bundle_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path());
    write_workbook(&store.upload_path(USER, "xlsx"), &full_portfolio());

    let bundle = chart_data_for(&store, USER).unwrap();

    assert_eq!(bundle.history.labels, vec!["2023-01-05", "2023-02-10"]);
    assert_eq!(bundle.history.data, vec![100000.0, 150000.0]);

    assert_eq!(bundle.scatter.labels, vec!["12 Oak St", "48 Elm Ave"]);
    assert_eq!(bundle.scatter.data, vec![80000.0, -5000.0]);

    assert_eq!(bundle.cash_flow.labels, vec!["12 Oak St", "48 Elm Ave"]);
    assert_eq!(bundle.cash_flow.data, vec![1200.50, 300.0]);

    assert_eq!(bundle.lead_channel.labels, vec!["Zillow", "Referral"]);
    assert_eq!(bundle.lead_channel.data, vec![2, 1]);

    let json = serde_json::to_value(&bundle).unwrap();
    assert_eq!(json["historyChart"]["data"][0], 100000.0);
    assert_eq!(json["leadChannelChart"]["data"], serde_json::json!([2, 1]));
}

#[test]
fn missing_sheet_fails_the_whole_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path());
    let sheets = vec![
        ("Sold Flips", sold_flips_part()),
        ("Flip Inventory Sheet", flip_inventory_part()),
    ];
    write_workbook(&store.upload_path(USER, "xlsx"), &sheets);

    let error = chart_data_for(&store, USER).unwrap_err();
    assert!(matches!(error, FlipfolioError::SheetNotFound { name } if name == "Kiavi Loans"));
}

#[test]
fn unknown_user_is_not_an_extraction_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path());

    let error = chart_data_for(&store, "stranger@example.com").unwrap_err();
    assert!(matches!(error, FlipfolioError::WorkbookNotFound { .. }));
    assert_eq!(summary_for(&store, "stranger@example.com"), store::NO_UPLOAD_SUMMARY);
}

#[test]
fn summary_renders_every_sheet_of_the_upload() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path());
    write_workbook(&store.upload_path(USER, "xlsx"), &full_portfolio());

    let text = summary_for(&store, USER);
    for name in ["Sold Flips", "Kiavi Loans", "Flip Inventory Sheet"] {
        assert!(text.contains(&format!("\nSheet: {}\n", name)), "missing {}", name);
    }
    assert!(text.contains("12 Oak St"));
    assert!(text.contains("$100,000"));
}

#[test]
fn corrupt_upload_degrades_summary_but_fails_charts() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path());
    std::fs::write(store.upload_path(USER, "xlsx"), b"not a zip archive").unwrap();

    assert!(chart_data_for(&store, USER).is_err());
    let text = summary_for(&store, USER);
    assert!(!text.is_empty());
    assert!(!text.contains("Sheet:"));
}
