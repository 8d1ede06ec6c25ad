use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::core::canvas::PhysicalSize;
use crate::error::Result;

/// Output formats offered over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn filename(&self) -> &'static str {
        match self {
            ExportFormat::Png => "sticker.png",
            ExportFormat::Pdf => "sticker.pdf",
        }
    }

    pub fn export(&self, img: &RgbaImage, size: &PhysicalSize) -> Result<Vec<u8>> {
        match self {
            ExportFormat::Png => encode_png(img, size.dpi),
            ExportFormat::Pdf => encode_pdf(img, size),
        }
    }
}

fn dots_per_meter(dpi: u32) -> u32 {
    (dpi as f64 / 0.0254).round() as u32
}

/// RGBA PNG carrying a `pHYs` chunk so print tools pick up the DPI.
pub fn encode_png(img: &RgbaImage, dpi: u32) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, img.width(), img.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let ppm = dots_per_meter(dpi);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));

        let mut writer = encoder.write_header()?;
        writer.write_image_data(img.as_raw())?;
        writer.finish()?;
    }
    Ok(buf)
}

/// Single-page PDF sized to the physical sticker. The image is embedded as
/// RGB samples with its alpha channel as a soft mask, scaled to fit the page
/// with its aspect ratio kept and centered.
pub fn encode_pdf(img: &RgbaImage, size: &PhysicalSize) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for pixel in img.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let smask_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8_i64,
        },
        alpha,
    ));
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Interpolate" => false,
            "SMask" => smask_id,
        },
        rgb,
    ));

    let (page_w, page_h) = size.points();
    let scale = (page_w / width as f64).min(page_h / height as f64);
    let (draw_w, draw_h) = (width as f64 * scale, height as f64 * scale);
    let (offset_x, offset_y) = ((page_w - draw_w) / 2.0, (page_h - draw_h) / 2.0);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(draw_w as _),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(draw_h as _),
                    Object::Real(offset_x as _),
                    Object::Real(offset_y as _),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(page_w as _),
        Object::Real(page_h as _),
    ];
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => media_box.clone(),
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                "Im0" => image_id,
            },
        },
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1_i64,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(90, 120, Rgba([242, 195, 0, 255]));
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        img
    }

    #[test]
    fn test_png_carries_dpi() {
        let bytes = encode_png(&sample(), 300).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (90, 120));
        let dims = info.pixel_dims.expect("pHYs chunk missing");
        assert_eq!(dims.xppu, 11811);
        assert_eq!(dims.yppu, 11811);
        assert_eq!(dims.unit, png::Unit::Meter);
    }

    #[test]
    fn test_pdf_has_one_page_of_physical_size() {
        let bytes = encode_pdf(&sample(), &PhysicalSize::STICKER).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.values().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        let width = media_box[2].as_float().unwrap();
        let height = media_box[3].as_float().unwrap();
        assert!((width - 215.43).abs() < 0.01);
        assert!((height - 286.30).abs() < 0.01);
    }

    #[test]
    fn test_pdf_image_has_soft_mask() {
        let bytes = encode_pdf(&sample(), &PhysicalSize::STICKER).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let masked = doc.objects.values().any(|object| match object {
            Object::Stream(stream) => stream.dict.get(b"SMask").is_ok(),
            _ => false,
        });
        assert!(masked);
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Png.mime_type(), "image/png");
        assert_eq!(ExportFormat::Pdf.filename(), "sticker.pdf");
    }
}
