//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::{read_styles_xml, ParsedStyles};
use rowbind_core::{CellAddress, CellValue, Style, Workbook, Worksheet};

/// Decode the container's `_xHHHH_` escape sequences in strings.
///
/// Spreadsheet XML encodes control characters this way:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_cell_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '_' {
            result.push(c);
            continue;
        }

        let mut hex_chars = String::new();
        let mut decoded = None;

        if chars.peek() == Some(&'x') {
            chars.next();

            for _ in 0..4 {
                match chars.peek() {
                    Some(&ch) if ch.is_ascii_hexdigit() => {
                        hex_chars.push(ch);
                        chars.next();
                    }
                    _ => break,
                }
            }

            if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
                chars.next();
                decoded = u32::from_str_radix(&hex_chars, 16)
                    .ok()
                    .and_then(char::from_u32);
            }
        }

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                // Not a valid escape sequence; keep what was consumed
                result.push('_');
                if !hex_chars.is_empty() {
                    result.push('x');
                    result.push_str(&hex_chars);
                }
            }
        }
    }

    result
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let styles = Self::read_styles(&mut archive)?;
        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let mut workbook = Workbook::empty();

        for (name, r_id) in &sheet_info {
            let Some(path) = sheet_paths.get(r_id) else {
                log::warn!("sheet {:?} has no relationship target, skipping", name);
                continue;
            };
            let sheet_idx = workbook.add_worksheet_with_name(name)?;
            Self::read_worksheet(
                &mut archive,
                path,
                workbook.worksheet_mut(sheet_idx).expect("just added"),
                &shared_strings,
                &styles,
            )?;
        }

        // A workbook is never sheetless
        if workbook.is_empty() {
            workbook.add_worksheet_with_name("Sheet1")?;
        }

        Ok(workbook)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"t" if in_si => {
                        in_t = true;
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_cell_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"t" => {
                        in_t = false;
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    if let Ok(text) = e.unescape() {
                        current_string.push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    fn read_styles<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> XlsxResult<ParsedStyles> {
        let file = match archive.by_name("xl/styles.xml") {
            Ok(f) => f,
            Err(_) => return Ok(ParsedStyles::default()),
        };
        read_styles_xml(file)
    }

    /// Read workbook.xml to get sheet names and rIds
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    let mut name = None;
                    let mut r_id = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => {
                                name = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"r:id" => {
                                r_id = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            _ => {}
                        }
                    }

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => {
                                id = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"Target" => {
                                target = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"Type" => {
                                rel_type = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            _ => {}
                        }
                    }

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to the xl/ folder
                            let full_path = if let Some(stripped) = target.strip_prefix('/') {
                                stripped.to_string()
                            } else {
                                format!("xl/{}", target)
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read one worksheet part into the sheet model
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        sheet: &mut Worksheet,
        shared_strings: &[String],
        styles: &ParsedStyles,
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();

        // State for the cell currently being parsed
        let mut current_addr: Option<CellAddress> = None;
        let mut current_type: Option<String> = None;
        let mut current_style: u32 = 0;
        let mut current_text = String::new();
        let mut in_v = false;
        let mut in_is_t = false;

        loop {
            let event = xml_reader.read_event_into(&mut buf);
            match event {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let is_empty = matches!(event, Ok(Event::Empty(_)));
                    match e.name().as_ref() {
                        b"col" => {
                            let mut min = None;
                            let mut max = None;
                            let mut width = None;
                            for attr in e.attributes().flatten() {
                                let value = match attr.unescape_value() {
                                    Ok(v) => v.to_string(),
                                    Err(_) => continue,
                                };
                                match attr.key.as_ref() {
                                    b"min" => min = value.parse::<u32>().ok(),
                                    b"max" => max = value.parse::<u32>().ok(),
                                    b"width" => width = value.parse::<f64>().ok(),
                                    _ => {}
                                }
                            }
                            if let (Some(min), Some(max), Some(width)) = (min, max, width) {
                                for col in min..=max {
                                    if col >= 1 && col <= u16::MAX as u32 {
                                        sheet.set_column_width((col - 1) as u16, width);
                                    }
                                }
                            }
                        }
                        b"row" => {
                            let mut row_idx = None;
                            let mut height = None;
                            for attr in e.attributes().flatten() {
                                let value = match attr.unescape_value() {
                                    Ok(v) => v.to_string(),
                                    Err(_) => continue,
                                };
                                match attr.key.as_ref() {
                                    b"r" => row_idx = value.parse::<u32>().ok(),
                                    b"ht" => height = value.parse::<f64>().ok(),
                                    _ => {}
                                }
                            }
                            if let (Some(r), Some(h)) = (row_idx, height) {
                                if r >= 1 {
                                    sheet.set_row_height(r - 1, h);
                                }
                            }
                        }
                        b"c" => {
                            current_addr = None;
                            current_type = None;
                            current_style = 0;
                            current_text.clear();

                            for attr in e.attributes().flatten() {
                                let value = match attr.unescape_value() {
                                    Ok(v) => v.to_string(),
                                    Err(_) => continue,
                                };
                                match attr.key.as_ref() {
                                    b"r" => current_addr = CellAddress::parse(&value).ok(),
                                    b"t" => current_type = Some(value),
                                    b"s" => current_style = value.parse().unwrap_or(0),
                                    _ => {}
                                }
                            }

                            if is_empty {
                                Self::commit_cell(
                                    sheet,
                                    current_addr.take(),
                                    current_type.take(),
                                    current_style,
                                    "",
                                    shared_strings,
                                    styles,
                                )?;
                            }
                        }
                        b"v" if current_addr.is_some() && !is_empty => in_v = true,
                        b"t" if current_addr.is_some() && !is_empty => in_is_t = true,
                        _ => {}
                    }
                }
                Ok(Event::Text(ref e)) if in_v || in_is_t => {
                    if let Ok(text) = e.unescape() {
                        current_text.push_str(&text);
                    }
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"v" => in_v = false,
                    b"t" => in_is_t = false,
                    b"c" => {
                        let text = std::mem::take(&mut current_text);
                        Self::commit_cell(
                            sheet,
                            current_addr.take(),
                            current_type.take(),
                            current_style,
                            &text,
                            shared_strings,
                            styles,
                        )?;
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    /// Store one parsed cell (value and style) into the sheet
    fn commit_cell(
        sheet: &mut Worksheet,
        addr: Option<CellAddress>,
        cell_type: Option<String>,
        style_id: u32,
        text: &str,
        shared_strings: &[String],
        styles: &ParsedStyles,
    ) -> XlsxResult<()> {
        let Some(addr) = addr else {
            return Ok(());
        };

        let value = match cell_type.as_deref() {
            Some("s") => match text.parse::<usize>().ok().and_then(|i| shared_strings.get(i)) {
                Some(s) => Some(CellValue::Text(s.clone())),
                None => {
                    log::warn!("unresolved shared string index {:?} at {}", text, addr);
                    None
                }
            },
            Some("inlineStr") => Some(CellValue::Text(decode_cell_escapes(text))),
            Some("str") => Some(CellValue::Text(text.to_string())),
            Some("b") => Some(CellValue::Boolean(text == "1" || text == "true")),
            Some("e") => {
                log::warn!("skipping error cell at {}", addr);
                None
            }
            _ if text.is_empty() => None,
            _ => match text.parse::<f64>() {
                Ok(n) => Some(CellValue::Number(n)),
                Err(_) => Some(CellValue::Text(text.to_string())),
            },
        };

        if let Some(value) = value {
            sheet.set_value_at(addr.row, addr.col, value)?;
        }

        if style_id != 0 {
            match styles.cell_styles.get(style_id as usize) {
                Some(style) if *style != Style::default() => {
                    sheet.set_cell_style_at(addr.row, addr.col, style)?;
                }
                _ => {}
            }
        }

        Ok(())
    }
}
