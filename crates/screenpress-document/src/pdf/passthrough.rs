// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Embed an original capture without decoding it.
//
// PNG image data is a zlib stream with per-row filters, which is exactly
// what a PDF `/FlateDecode` filter with `/Predictor 15` expects, so the IDAT
// chunks can be copied into an image XObject as they are. JPEG files are
// valid `/DCTDecode` streams already. Neither path inflates or decodes the
// pixels, so a capture whose tail is damaged still yields a page.

use std::collections::BTreeMap;

use printpdf::{DictItem, ExternalStream, ExternalXObject, Px};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Build an image XObject that carries `bytes` without re-encoding.
///
/// Only opaque, non-interlaced PNG and baseline or progressive JPEG are
/// accepted; anything else is left for the decoding path.
pub(crate) fn embed_original(bytes: &[u8]) -> Result<ExternalXObject, String> {
    if let Some(chunks) = bytes.strip_prefix(PNG_SIGNATURE) {
        png_xobject(chunks)
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        jpeg_xobject(bytes)
    } else {
        Err("only PNG and JPEG can be embedded undecoded".to_string())
    }
}

fn image_xobject(
    width: u32,
    height: u32,
    mut dict: BTreeMap<String, DictItem>,
    content: Vec<u8>,
) -> ExternalXObject {
    dict.insert("Type".into(), name("XObject"));
    dict.insert("Subtype".into(), name("Image"));
    dict.insert("Width".into(), DictItem::Int(i64::from(width)));
    dict.insert("Height".into(), DictItem::Int(i64::from(height)));
    ExternalXObject {
        stream: ExternalStream {
            dict,
            content,
            compress: false,
        },
        width: Some(Px(width as usize)),
        height: Some(Px(height as usize)),
        dpi: None,
    }
}

fn name(value: &str) -> DictItem {
    DictItem::Name(value.as_bytes().to_vec())
}

// -- PNG ----------------------------------------------------------------------

struct PngHeader {
    width: u32,
    height: u32,
    bit_depth: u8,
    color_type: u8,
    interlaced: bool,
}

/// Yield `(kind, body)` for each chunk. A chunk cut short by the end of the
/// file yields what is left of its body; the CRC is never checked.
fn png_chunks(mut rest: &[u8]) -> impl Iterator<Item = ([u8; 4], &[u8])> {
    std::iter::from_fn(move || {
        let chunk = rest;
        if chunk.len() < 8 {
            return None;
        }
        let len = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as usize;
        let kind = [chunk[4], chunk[5], chunk[6], chunk[7]];
        let end = 8usize.saturating_add(len).min(chunk.len());
        rest = chunk.get(end.saturating_add(4)..).unwrap_or(&[]);
        Some((kind, &chunk[8..end]))
    })
}

fn png_xobject(chunks: &[u8]) -> Result<ExternalXObject, String> {
    let mut header = None;
    let mut palette: &[u8] = &[];
    let mut data = Vec::new();

    for (kind, body) in png_chunks(chunks) {
        match &kind {
            b"IHDR" => header = Some(png_header(body)?),
            b"PLTE" => palette = body,
            b"IDAT" => data.extend_from_slice(body),
            b"IEND" => break,
            _ => {}
        }
    }

    let header = header.ok_or("PNG has no IHDR chunk")?;
    if header.interlaced {
        return Err("interlaced PNG cannot be embedded undecoded".to_string());
    }
    if data.is_empty() {
        return Err("PNG has no image data".to_string());
    }

    let (color_space, colors) = match header.color_type {
        0 => (name("DeviceGray"), 1),
        2 => (name("DeviceRGB"), 3),
        3 => {
            let entries = palette.len() / 3;
            if entries == 0 {
                return Err("palette PNG has no PLTE chunk".to_string());
            }
            let indexed = DictItem::Array(vec![
                name("Indexed"),
                name("DeviceRGB"),
                DictItem::Int(entries as i64 - 1),
                DictItem::String {
                    data: palette[..entries * 3].to_vec(),
                    literal: false,
                },
            ]);
            (indexed, 1)
        }
        4 | 6 => return Err("PNG carries an alpha channel".to_string()),
        other => return Err(format!("unknown PNG colour type {other}")),
    };

    let bits = DictItem::Int(i64::from(header.bit_depth));
    let parms = BTreeMap::from([
        ("Predictor".to_string(), DictItem::Int(15)),
        ("Colors".to_string(), DictItem::Int(colors)),
        ("BitsPerComponent".to_string(), bits.clone()),
        ("Columns".to_string(), DictItem::Int(i64::from(header.width))),
    ]);
    let dict = BTreeMap::from([
        ("ColorSpace".to_string(), color_space),
        ("BitsPerComponent".to_string(), bits),
        ("Filter".to_string(), name("FlateDecode")),
        ("DecodeParms".to_string(), DictItem::Dict { map: parms }),
    ]);
    Ok(image_xobject(header.width, header.height, dict, data))
}

fn png_header(body: &[u8]) -> Result<PngHeader, String> {
    if body.len() < 13 {
        return Err("PNG IHDR chunk is truncated".to_string());
    }
    let width = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
    let height = u32::from_be_bytes([body[4], body[5], body[6], body[7]]);
    if width == 0 || height == 0 {
        return Err(format!("PNG has zero-sized dimensions {width}x{height}"));
    }
    Ok(PngHeader {
        width,
        height,
        bit_depth: body[8],
        color_type: body[9],
        interlaced: body[12] != 0,
    })
}

// -- JPEG ---------------------------------------------------------------------

fn jpeg_xobject(bytes: &[u8]) -> Result<ExternalXObject, String> {
    let (width, height, precision, components) = jpeg_frame(bytes)?;
    let color_space = match components {
        1 => name("DeviceGray"),
        3 => name("DeviceRGB"),
        other => return Err(format!("JPEG with {other} components is not supported")),
    };
    let dict = BTreeMap::from([
        ("ColorSpace".to_string(), color_space),
        ("BitsPerComponent".to_string(), DictItem::Int(i64::from(precision))),
        ("Filter".to_string(), name("DCTDecode")),
    ]);
    Ok(image_xobject(
        u32::from(width),
        u32::from(height),
        dict,
        bytes.to_vec(),
    ))
}

/// Walk the marker segments up to the first frame header and return its
/// width, height, sample precision and component count.
fn jpeg_frame(bytes: &[u8]) -> Result<(u16, u16, u8, u8), String> {
    let mut pos = 2;
    loop {
        while bytes.get(pos) == Some(&0xFF) && bytes.get(pos + 1) == Some(&0xFF) {
            pos += 1;
        }
        let (Some(&0xFF), Some(&marker)) = (bytes.get(pos), bytes.get(pos + 1)) else {
            return Err("JPEG ends before its frame header".to_string());
        };
        pos += 2;
        if marker == 0x01 || (0xD0..=0xD9).contains(&marker) {
            continue;
        }
        let len = match bytes.get(pos..pos + 2) {
            Some(&[hi, lo]) => usize::from(u16::from_be_bytes([hi, lo])),
            _ => return Err("JPEG ends before its frame header".to_string()),
        };
        match marker {
            0xC0..=0xC2 => {
                let Some(segment) = bytes.get(pos + 2..pos + 8) else {
                    return Err("JPEG frame header is truncated".to_string());
                };
                let height = u16::from_be_bytes([segment[1], segment[2]]);
                let width = u16::from_be_bytes([segment[3], segment[4]]);
                if width == 0 || height == 0 {
                    return Err(format!("JPEG frame is {width}x{height}"));
                }
                return Ok((width, height, segment[0], segment[5]));
            }
            0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF => {
                return Err(format!("JPEG frame type {marker:#04X} is not supported"));
            }
            _ => pos += len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut buffer), format)
            .unwrap();
        buffer
    }

    fn noisy_rgb(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 + y * 13) as u8, (x * y) as u8, (x ^ y) as u8])
        }))
    }

    fn int(xobject: &ExternalXObject, key: &str) -> i64 {
        match xobject.stream.dict.get(key) {
            Some(DictItem::Int(value)) => *value,
            other => panic!("{key} is {other:?}"),
        }
    }

    fn name_of(xobject: &ExternalXObject, key: &str) -> Vec<u8> {
        match xobject.stream.dict.get(key) {
            Some(DictItem::Name(value)) => value.clone(),
            other => panic!("{key} is {other:?}"),
        }
    }

    #[test]
    fn png_data_is_copied_with_a_predictor() {
        let xobject = embed_original(&encode(noisy_rgb(30, 20), ImageFormat::Png)).unwrap();
        assert_eq!((int(&xobject, "Width"), int(&xobject, "Height")), (30, 20));
        assert_eq!(name_of(&xobject, "Filter"), b"FlateDecode");
        assert_eq!(name_of(&xobject, "ColorSpace"), b"DeviceRGB");
        assert_eq!(xobject.width, Some(Px(30)));
        match xobject.stream.dict.get("DecodeParms") {
            Some(DictItem::Dict { map }) => {
                assert!(matches!(map.get("Predictor"), Some(DictItem::Int(15))));
                assert!(matches!(map.get("Colors"), Some(DictItem::Int(3))));
                assert!(matches!(map.get("Columns"), Some(DictItem::Int(30))));
            }
            other => panic!("DecodeParms is {other:?}"),
        }
    }

    #[test]
    fn truncated_png_keeps_its_header_size() {
        let bytes = encode(noisy_rgb(64, 64), ImageFormat::Png);
        let xobject = embed_original(&bytes[..bytes.len() / 2]).unwrap();
        assert_eq!((int(&xobject, "Width"), int(&xobject, "Height")), (64, 64));
        assert!(!xobject.stream.content.is_empty());
    }

    #[test]
    fn gray_png_uses_one_colour() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(5, 5, Luma([7])));
        let xobject = embed_original(&encode(image, ImageFormat::Png)).unwrap();
        assert_eq!(name_of(&xobject, "ColorSpace"), b"DeviceGray");
    }

    #[test]
    fn alpha_png_is_refused() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 4])));
        let err = embed_original(&encode(image, ImageFormat::Png)).unwrap_err();
        assert!(err.contains("alpha"), "{err}");
    }

    #[test]
    fn png_without_header_is_refused() {
        assert!(embed_original(b"\x89PNG\r\n\x1a\ngarbage").is_err());
    }

    #[test]
    fn jpeg_is_passed_through_whole() {
        let bytes = encode(noisy_rgb(33, 17), ImageFormat::Jpeg);
        let xobject = embed_original(&bytes).unwrap();
        assert_eq!((int(&xobject, "Width"), int(&xobject, "Height")), (33, 17));
        assert_eq!(name_of(&xobject, "Filter"), b"DCTDecode");
        assert_eq!(name_of(&xobject, "ColorSpace"), b"DeviceRGB");
        assert_eq!(int(&xobject, "BitsPerComponent"), 8);
        assert_eq!(xobject.stream.content, bytes);
    }

    #[test]
    fn gray_jpeg_is_device_gray() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([90])));
        let xobject = embed_original(&encode(image, ImageFormat::Jpeg)).unwrap();
        assert_eq!(name_of(&xobject, "ColorSpace"), b"DeviceGray");
    }

    #[test]
    fn jpeg_cut_before_its_frame_is_refused() {
        let bytes = encode(noisy_rgb(8, 8), ImageFormat::Jpeg);
        assert!(embed_original(&bytes[..4]).is_err());
    }

    #[test]
    fn other_formats_are_refused() {
        let bytes = encode(noisy_rgb(4, 4), ImageFormat::Bmp);
        assert!(embed_original(&bytes).is_err());
    }
}
