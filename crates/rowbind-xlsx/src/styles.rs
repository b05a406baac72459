//! XLSX styles (styles.xml) read/write helpers

use std::collections::HashMap;
use std::io::{BufReader, Read};

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use rowbind_core::style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, HorizontalAlignment,
    Style, VerticalAlignment,
};
use rowbind_core::Workbook;

// === Writing ===

/// Workbook-wide style table for the write path
///
/// Worksheet style pools are local; cellXfs indices are global. The
/// table deduplicates styles across sheets and maps each worksheet's
/// local style index to its global xf id.
#[derive(Debug)]
pub(crate) struct XlsxStyleTable {
    /// Global, deduplicated styles. Index corresponds to the cellXfs index.
    styles: Vec<Style>,
    /// Per-worksheet mapping: local worksheet style index -> global xf id.
    sheet_maps: Vec<HashMap<u32, u32>>,
}

impl XlsxStyleTable {
    pub(crate) fn build(workbook: &Workbook) -> Self {
        let mut styles: Vec<Style> = Vec::new();
        let mut style_to_xf: HashMap<Style, u32> = HashMap::new();

        let default = Style::default();
        styles.push(default.clone());
        style_to_xf.insert(default, 0);

        let mut sheet_maps: Vec<HashMap<u32, u32>> = Vec::with_capacity(workbook.sheet_count());

        for sheet in workbook.worksheets() {
            let mut map: HashMap<u32, u32> = HashMap::new();
            map.insert(0, 0);

            for (_row, _col, cell) in sheet.iter_cells() {
                let local_idx = cell.style_index;
                if local_idx == 0 || map.contains_key(&local_idx) {
                    continue;
                }

                let style = sheet
                    .style_by_index(local_idx)
                    .cloned()
                    .unwrap_or_default();

                let xf_id = match style_to_xf.get(&style) {
                    Some(&id) => id,
                    None => {
                        let id = styles.len() as u32;
                        styles.push(style.clone());
                        style_to_xf.insert(style, id);
                        id
                    }
                };

                map.insert(local_idx, xf_id);
            }

            sheet_maps.push(map);
        }

        Self { styles, sheet_maps }
    }

    pub(crate) fn xf_id_for(&self, sheet_index: usize, local_style_index: u32) -> u32 {
        self.sheet_maps
            .get(sheet_index)
            .and_then(|m| m.get(&local_style_index).copied())
            .unwrap_or(0)
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        // Component tables. The container requires fills 0 and 1 to be
        // none and gray125; entry 1 is a placeholder rendered as gray125.
        const GRAY125_SLOT: usize = 1;
        let mut fill_ids: HashMap<FillStyle, u32> = HashMap::new();
        let mut fills: Vec<FillStyle> = vec![FillStyle::None, FillStyle::None];
        fill_ids.insert(FillStyle::None, 0);

        let mut border_ids: HashMap<BorderStyle, u32> = HashMap::new();
        let mut borders: Vec<BorderStyle> = vec![BorderStyle::default()];
        border_ids.insert(BorderStyle::default(), 0);

        let mut resolved: Vec<(u32, u32)> = Vec::with_capacity(self.styles.len());
        for style in &self.styles {
            let fill_id = match fill_ids.get(&style.fill) {
                Some(&id) => id,
                None => {
                    let id = fills.len() as u32;
                    fills.push(style.fill);
                    fill_ids.insert(style.fill, id);
                    id
                }
            };

            let border_id = match border_ids.get(&style.border) {
                Some(&id) => id,
                None => {
                    let id = borders.len() as u32;
                    borders.push(style.border.clone());
                    border_ids.insert(style.border.clone(), id);
                    id
                }
            };

            resolved.push((fill_id, border_id));
        }

        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <fonts count="1">
        <font><sz val="11"/><name val="Calibri"/></font>
    </fonts>"#,
        );

        // Fills (entry 1 is always the required gray125 pattern)
        xml.push_str(&format!("\n    <fills count=\"{}\">", fills.len()));
        for (i, fill) in fills.iter().enumerate() {
            if i == GRAY125_SLOT {
                xml.push_str("\n        <fill><patternFill patternType=\"gray125\"/></fill>");
            } else {
                xml.push_str(&write_fill(fill));
            }
        }
        xml.push_str("\n    </fills>");

        // Borders
        xml.push_str(&format!("\n    <borders count=\"{}\">", borders.len()));
        for border in &borders {
            xml.push_str(&write_border(border));
        }
        xml.push_str("\n    </borders>");

        xml.push_str(
            r#"
    <cellStyleXfs count="1">
        <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
    </cellStyleXfs>"#,
        );

        // Cell formats
        xml.push_str(&format!("\n    <cellXfs count=\"{}\">", self.styles.len()));
        for (style, &(fill_id, border_id)) in self.styles.iter().zip(&resolved) {
            xml.push_str(&write_xf(style, fill_id, border_id));
        }
        xml.push_str("\n    </cellXfs>\n</styleSheet>");

        xml
    }
}

fn write_fill(fill: &FillStyle) -> String {
    match fill {
        FillStyle::None => "\n        <fill><patternFill patternType=\"none\"/></fill>".to_string(),
        FillStyle::Solid { color } => format!(
            "\n        <fill><patternFill patternType=\"solid\"><fgColor rgb=\"{}\"/><bgColor indexed=\"64\"/></patternFill></fill>",
            color.to_argb_hex()
        ),
    }
}

fn write_border_edge(tag: &str, edge: &Option<BorderEdge>) -> String {
    match edge {
        None => format!("<{}/>", tag),
        Some(edge) => format!(
            "<{} style=\"{}\"><color rgb=\"{}\"/></{}>",
            tag,
            edge.style.xlsx_name(),
            edge.color.to_argb_hex(),
            tag
        ),
    }
}

fn write_border(border: &BorderStyle) -> String {
    format!(
        "\n        <border>{}{}{}{}<diagonal/></border>",
        write_border_edge("left", &border.left),
        write_border_edge("right", &border.right),
        write_border_edge("top", &border.top),
        write_border_edge("bottom", &border.bottom),
    )
}

fn horiz_to_str(h: HorizontalAlignment) -> Option<&'static str> {
    match h {
        HorizontalAlignment::General => None,
        HorizontalAlignment::Left => Some("left"),
        HorizontalAlignment::Center => Some("center"),
        HorizontalAlignment::Right => Some("right"),
    }
}

fn vert_to_str(v: VerticalAlignment) -> Option<&'static str> {
    match v {
        VerticalAlignment::Top => Some("top"),
        VerticalAlignment::Center => Some("center"),
        VerticalAlignment::Bottom => None,
    }
}

fn write_alignment(al: &Alignment) -> String {
    if al.is_default() {
        return String::new();
    }

    let mut attrs = String::new();
    if let Some(h) = horiz_to_str(al.horizontal) {
        attrs.push_str(&format!(" horizontal=\"{}\"", h));
    }
    if let Some(v) = vert_to_str(al.vertical) {
        attrs.push_str(&format!(" vertical=\"{}\"", v));
    }
    if al.wrap_text {
        attrs.push_str(" wrapText=\"1\"");
    }
    format!("<alignment{}/>", attrs)
}

fn write_xf(style: &Style, fill_id: u32, border_id: u32) -> String {
    let mut attrs = format!(
        "numFmtId=\"0\" fontId=\"0\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"",
        fill_id, border_id
    );
    if fill_id != 0 {
        attrs.push_str(" applyFill=\"1\"");
    }
    if border_id != 0 {
        attrs.push_str(" applyBorder=\"1\"");
    }

    let alignment = write_alignment(&style.alignment);
    if alignment.is_empty() {
        format!("\n        <xf {}/>", attrs)
    } else {
        format!(
            "\n        <xf {} applyAlignment=\"1\">{}</xf>",
            attrs, alignment
        )
    }
}

// === Reading ===

/// Styles parsed from styles.xml, indexed by cellXfs position
#[derive(Debug)]
pub(crate) struct ParsedStyles {
    pub cell_styles: Vec<Style>,
}

impl Default for ParsedStyles {
    fn default() -> Self {
        Self {
            cell_styles: vec![Style::default()],
        }
    }
}

fn str_to_horizontal(s: &str) -> Option<HorizontalAlignment> {
    match s {
        "general" => Some(HorizontalAlignment::General),
        "left" => Some(HorizontalAlignment::Left),
        "center" | "centerContinuous" => Some(HorizontalAlignment::Center),
        "right" => Some(HorizontalAlignment::Right),
        _ => None,
    }
}

fn str_to_vertical(s: &str) -> Option<VerticalAlignment> {
    match s {
        "top" => Some(VerticalAlignment::Top),
        "center" => Some(VerticalAlignment::Center),
        "bottom" => Some(VerticalAlignment::Bottom),
        _ => None,
    }
}

/// Parse styles.xml into per-xf [`Style`] entries
pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<ParsedStyles> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    #[derive(PartialEq)]
    enum Section {
        None,
        Fills,
        Borders,
        CellXfs,
    }

    let mut section = Section::None;
    let mut buf = Vec::new();

    let mut fills: Vec<FillStyle> = Vec::new();
    let mut fill_is_solid = false;
    let mut current_fill = FillStyle::None;

    let mut borders: Vec<BorderStyle> = Vec::new();
    let mut current_border: Option<BorderStyle> = None;
    let mut current_edge: Option<String> = None;

    let mut xfs: Vec<Style> = Vec::new();
    let mut current_xf: Option<Style> = None;

    loop {
        let event = xml_reader.read_event_into(&mut buf);
        match event {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let is_empty = matches!(event, Ok(Event::Empty(_)));
                let name = e.name().as_ref().to_vec();
                match name.as_slice() {
                    b"fills" => section = Section::Fills,
                    b"borders" => section = Section::Borders,
                    b"cellXfs" => section = Section::CellXfs,

                    b"fill" if section == Section::Fills => {
                        if is_empty {
                            fills.push(FillStyle::None);
                        } else {
                            fill_is_solid = false;
                            current_fill = FillStyle::None;
                        }
                    }
                    b"patternFill" if section == Section::Fills => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"patternType" {
                                if let Ok(v) = attr.unescape_value() {
                                    fill_is_solid = v.as_ref() == "solid";
                                }
                            }
                        }
                    }
                    b"fgColor" if section == Section::Fills && fill_is_solid => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"rgb" {
                                if let Some(color) =
                                    attr.unescape_value().ok().and_then(|v| Color::from_hex(&v))
                                {
                                    current_fill = FillStyle::Solid { color };
                                }
                            }
                        }
                    }

                    b"border" if section == Section::Borders => {
                        if is_empty {
                            borders.push(BorderStyle::default());
                        } else {
                            current_border = Some(BorderStyle::default());
                            current_edge = None;
                        }
                    }
                    b"left" | b"right" | b"top" | b"bottom"
                        if section == Section::Borders && current_border.is_some() =>
                    {
                        let edge_name = String::from_utf8_lossy(&name).to_string();
                        let mut edge_style = None;
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"style" {
                                if let Ok(v) = attr.unescape_value() {
                                    edge_style = Some(BorderLineStyle::from_xlsx_name(&v));
                                }
                            }
                        }
                        if let Some(style) = edge_style.filter(|s| *s != BorderLineStyle::None) {
                            let edge = BorderEdge::new(style, Color::BLACK);
                            if let Some(border) = current_border.as_mut() {
                                set_border_edge(border, &edge_name, edge);
                            }
                            // Empty edges have no color child to wait for
                            current_edge = if is_empty { None } else { Some(edge_name) };
                        } else {
                            current_edge = None;
                        }
                    }
                    b"color" if section == Section::Borders => {
                        if let (Some(border), Some(edge_name)) =
                            (current_border.as_mut(), current_edge.as_deref())
                        {
                            for attr in e.attributes().flatten() {
                                if attr.key.as_ref() == b"rgb" {
                                    if let Some(color) = attr
                                        .unescape_value()
                                        .ok()
                                        .and_then(|v| Color::from_hex(&v))
                                    {
                                        recolor_border_edge(border, edge_name, color);
                                    }
                                }
                            }
                        }
                    }

                    b"xf" if section == Section::CellXfs => {
                        let mut style = Style::default();
                        for attr in e.attributes().flatten() {
                            let value = match attr.unescape_value() {
                                Ok(v) => v.to_string(),
                                Err(_) => continue,
                            };
                            match attr.key.as_ref() {
                                b"fillId" => {
                                    if let Ok(id) = value.parse::<usize>() {
                                        if let Some(fill) = fills.get(id) {
                                            style.fill = *fill;
                                        }
                                    }
                                }
                                b"borderId" => {
                                    if let Ok(id) = value.parse::<usize>() {
                                        if let Some(border) = borders.get(id) {
                                            style.border = border.clone();
                                        }
                                    }
                                }
                                _ => {}
                            }
                        }
                        if is_empty {
                            xfs.push(style);
                        } else {
                            current_xf = Some(style);
                        }
                    }
                    b"alignment" if section == Section::CellXfs => {
                        if let Some(style) = current_xf.as_mut() {
                            for attr in e.attributes().flatten() {
                                let value = match attr.unescape_value() {
                                    Ok(v) => v.to_string(),
                                    Err(_) => continue,
                                };
                                match attr.key.as_ref() {
                                    b"horizontal" => {
                                        if let Some(h) = str_to_horizontal(&value) {
                                            style.alignment.horizontal = h;
                                        }
                                    }
                                    b"vertical" => {
                                        if let Some(v) = str_to_vertical(&value) {
                                            style.alignment.vertical = v;
                                        }
                                    }
                                    b"wrapText" => {
                                        style.alignment.wrap_text = value == "1" || value == "true";
                                    }
                                    _ => {}
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"fills" | b"borders" | b"cellXfs" => section = Section::None,
                b"fill" if section == Section::Fills => {
                    fills.push(current_fill);
                    current_fill = FillStyle::None;
                }
                b"border" if section == Section::Borders => {
                    if let Some(border) = current_border.take() {
                        borders.push(border);
                    }
                }
                b"left" | b"right" | b"top" | b"bottom" if section == Section::Borders => {
                    current_edge = None;
                }
                b"xf" if section == Section::CellXfs => {
                    if let Some(style) = current_xf.take() {
                        xfs.push(style);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if xfs.is_empty() {
        xfs.push(Style::default());
    }

    Ok(ParsedStyles { cell_styles: xfs })
}

fn set_border_edge(border: &mut BorderStyle, edge: &str, val: BorderEdge) {
    match edge {
        "left" => border.left = Some(val),
        "right" => border.right = Some(val),
        "top" => border.top = Some(val),
        "bottom" => border.bottom = Some(val),
        _ => {}
    }
}

fn recolor_border_edge(border: &mut BorderStyle, edge: &str, color: Color) {
    let slot = match edge {
        "left" => &mut border.left,
        "right" => &mut border.right,
        "top" => &mut border.top,
        "bottom" => &mut border.bottom,
        _ => return,
    };
    if let Some(edge) = slot.as_mut() {
        edge.color = color;
    }
}
