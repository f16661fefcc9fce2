//! In-memory PDF fixtures for tests.

use crate::pdf::PdfDocument;
use lopdf::{
    dictionary, Document, EncryptionState, EncryptionVersion, Object, ObjectId, Permissions,
    Stream, StringFormat,
};

#[derive(Debug, Clone, Copy)]
pub struct TestPage {
    pub width: i64,
    pub height: i64,
    pub rotate: Option<i64>,
}

#[derive(Debug, Default)]
pub struct PdfBuilder {
    pub pages: Vec<TestPage>,
    pub info: Vec<(&'static str, &'static str)>,
    pub with_form: bool,
    /// Put the media box on the page tree node instead of each page
    pub inherited_media_box: Option<(i64, i64)>,
}

impl PdfBuilder {
    pub fn page(mut self, width: i64, height: i64) -> Self {
        self.pages.push(TestPage {
            width,
            height,
            rotate: None,
        });
        self
    }

    pub fn rotated_page(mut self, width: i64, height: i64, rotate: i64) -> Self {
        self.pages.push(TestPage {
            width,
            height,
            rotate: Some(rotate),
        });
        self
    }

    pub fn info(mut self, key: &'static str, value: &'static str) -> Self {
        self.info.push((key, value));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id: ObjectId = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::new();
        for (i, page) in self.pages.iter().enumerate() {
            let content = format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", i + 1);
            let content_id =
                doc.add_object(Stream::new(lopdf::Dictionary::new(), content.into_bytes()));

            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            };
            if self.inherited_media_box.is_none() {
                page_dict.set(
                    "MediaBox",
                    vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(page.width),
                        Object::Integer(page.height),
                    ],
                );
            }
            if let Some(rotate) = page.rotate {
                page_dict.set("Rotate", Object::Integer(rotate));
            }
            kids.push(doc.add_object(page_dict).into());
        }

        let mut pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.pages.len() as i64,
        };
        if let Some((width, height)) = self.inherited_media_box {
            pages_dict.set(
                "MediaBox",
                vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(height),
                ],
            );
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if self.with_form {
            let field_id = doc.add_object(dictionary! {
                "FT" => "Tx",
                "T" => Object::string_literal("name"),
            });
            catalog.set(
                "AcroForm",
                dictionary! {
                    "Fields" => vec![Object::Reference(field_id)],
                },
            );
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        if !self.info.is_empty() {
            let mut info = lopdf::Dictionary::new();
            for &(key, value) in &self.info {
                info.set(key, Object::string_literal(value));
            }
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", info_id);
        }

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("failed to save test PDF");
        buf
    }
}

/// A PDF whose page `n` (1-based) has media box width `599 + n`.
pub fn create_test_pdf(num_pages: u32) -> Vec<u8> {
    let mut builder = PdfBuilder::default();
    for i in 0..num_pages {
        builder = builder.page(600 + i as i64, 792);
    }
    builder.build()
}

/// [`create_test_pdf`] encrypted with RC4-40, empty user password.
pub fn create_encrypted_test_pdf(num_pages: u32) -> Vec<u8> {
    let mut doc = Document::load_mem(&create_test_pdf(num_pages)).expect("fixture PDF");
    let id = Object::String(b"0123456789abcdef".to_vec(), StringFormat::Hexadecimal);
    doc.trailer.set("ID", vec![id.clone(), id]);

    let version = EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password: "",
        key_length: 40,
        permissions: Permissions::default(),
    };
    let state = EncryptionState::try_from(version).expect("encryption state");
    doc.encrypt(&state).expect("encrypt fixture");

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save encrypted test PDF");
    buf
}

/// Media box widths of each page, in page order.
pub fn page_widths(doc: &PdfDocument) -> Vec<f64> {
    doc.page_ids()
        .into_iter()
        .map(|(_, id)| {
            let page = doc.doc.get_dictionary(id).expect("page dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("media box");
            match &media_box[2] {
                Object::Integer(i) => *i as f64,
                Object::Real(r) => *r as f64,
                other => panic!("unexpected media box entry {:?}", other),
            }
        })
        .collect()
}
