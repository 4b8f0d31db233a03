//! SVG serialization of a [`SceneDocument`].

use std::fmt::Write;

use crate::path::format_num;
use crate::plot::{ContourGroup, SceneDocument};

/// Escape text for use in XML content and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize the whole scene as a standalone SVG document.
pub fn render_document(doc: &SceneDocument, width: u32, height: u32) -> String {
    let mut svg = String::new();
    // Writing into a String cannot fail
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    );

    if !doc.clips.is_empty() {
        svg.push_str("<defs>");
        for (id, clip) in doc.clips.iter() {
            let _ = write!(
                svg,
                r#"<clipPath id="{}"><path d="{}" clip-rule="evenodd"/></clipPath>"#,
                escape_xml(id),
                clip.d
            );
        }
        svg.push_str("</defs>");
    }

    for group in doc.groups() {
        render_group(&mut svg, group);
    }

    svg.push_str("</svg>");
    svg
}

fn render_group(svg: &mut String, group: &ContourGroup) {
    let _ = write!(svg, r#"<g class="contour" id="contour{}""#, escape_xml(&group.uid));
    if let Some(id) = &group.clip_id {
        let _ = write!(svg, r#" clip-path="url(#{})""#, escape_xml(id));
    }
    svg.push('>');

    if let Some(bg) = &group.background {
        let _ = write!(
            svg,
            r#"<path class="contourbg" d="{}" fill="{}" stroke="none"/>"#,
            bg.d,
            escape_xml(&bg.fill)
        );
    }

    svg.push_str(r#"<g class="contourfill">"#);
    for fill in group.fills.iter() {
        let _ = write!(
            svg,
            r#"<path d="{}" fill="{}" fill-rule="evenodd" stroke="none"/>"#,
            fill.d,
            escape_xml(&fill.fill)
        );
    }
    svg.push_str("</g>");

    svg.push_str(r#"<g class="contourlines""#);
    if let Some(id) = &group.line_clip_id {
        let _ = write!(svg, r#" clip-path="url(#{})""#, escape_xml(id));
    }
    svg.push('>');
    for line in group.lines.iter() {
        let _ = write!(
            svg,
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            line.d,
            escape_xml(&line.stroke),
            format_num(line.width)
        );
    }
    svg.push_str("</g>");

    if !group.labels.is_empty() {
        let font = &group.label_font;
        let _ = write!(
            svg,
            r#"<g class="contourlabels" font-family="{}" font-size="{}" text-anchor="middle">"#,
            escape_xml(&font.family),
            format_num(font.size)
        );
        for label in group.labels.iter() {
            let p = &label.placement;
            let at = p.render_position();
            let _ = write!(
                svg,
                r#"<text x="{}" y="{}" transform="{}" fill="{}">{}</text>"#,
                format_num(at.x),
                format_num(at.y),
                p.transform(),
                escape_xml(&label.color),
                escape_xml(&p.text)
            );
        }
        svg.push_str("</g>");
    }

    svg.push_str("</g>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml(r#"a<b & "c"'"#), "a&lt;b &amp; &quot;c&quot;&apos;");
    }

    #[test]
    fn test_empty_document() {
        let svg = render_document(&SceneDocument::new(), 10, 20);
        assert_eq!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="20" viewBox="0 0 10 20"></svg>"#
        );
    }
}
