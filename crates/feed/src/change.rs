//! Decoder for the WFS-Transaction change records embedded in entry
//! content: Insert, Update, and Delete.

use crate::wfs;
use geosync_bxml::{Token, XmlCursor};
use geosync_decode::{consume_children, text_content, DecodeError, Decoder, ElementDecoder};
use geosync_filter::FilterDecoder;
use geosync_types::{Change, PropertyUpdate, QName};

/// Decodes one transaction element. Inserted feature collections are not
/// replayed here; an Insert records only its handle and the features are
/// fetched out of band through the entry's content link.
pub struct ChangeDecoder {
    names: Vec<QName>,
}

impl ChangeDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![wfs("Insert"), wfs("Update"), wfs("Delete")],
        }
    }

    fn decode_update(&self, cursor: &mut XmlCursor, name: &QName) -> Result<Change, DecodeError> {
        let type_name = required_type_name(cursor, name)?;
        let mut properties = Vec::new();
        let mut filter = None;
        loop {
            cursor.next_tag()?;
            match cursor.token() {
                Token::Start(child) => {
                    let child = child.clone();
                    match child.local.as_str() {
                        "Property" => properties.push(decode_property(cursor, &child)?),
                        "Filter" => filter = Some(FilterDecoder::new().decode(cursor)?),
                        _ => cursor.skip_subtree()?,
                    }
                }
                Token::End(_) => break,
                _ => return Err(geosync_bxml::BxmlError::UnexpectedEof.into()),
            }
        }
        Ok(Change::Update {
            type_name,
            properties,
            filter,
        })
    }

    fn decode_delete(&self, cursor: &mut XmlCursor, name: &QName) -> Result<Change, DecodeError> {
        let type_name = required_type_name(cursor, name)?;
        let mut filter = None;
        loop {
            cursor.next_tag()?;
            match cursor.token() {
                Token::Start(child) => {
                    let child = child.clone();
                    match child.local.as_str() {
                        "Filter" => filter = Some(FilterDecoder::new().decode(cursor)?),
                        _ => cursor.skip_subtree()?,
                    }
                }
                Token::End(_) => break,
                _ => return Err(geosync_bxml::BxmlError::UnexpectedEof.into()),
            }
        }
        let filter = filter.ok_or_else(|| DecodeError::MissingElement {
            element: "Filter".to_string(),
            parent: name.clone(),
        })?;
        Ok(Change::Delete { type_name, filter })
    }
}

impl Default for ChangeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for ChangeDecoder {
    type Output = Change;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(&self, cursor: &mut XmlCursor, name: &QName) -> Result<Change, DecodeError> {
        match name.local.as_str() {
            "Insert" => {
                let handle = cursor.attribute("handle").map(str::to_owned);
                consume_children(cursor)?;
                Ok(Change::Insert { handle })
            }
            "Update" => self.decode_update(cursor, name),
            _ => self.decode_delete(cursor, name),
        }
    }
}

fn required_type_name(cursor: &XmlCursor, element: &QName) -> Result<String, DecodeError> {
    cursor
        .attribute("typeName")
        .map(str::to_owned)
        .ok_or_else(|| DecodeError::MissingAttribute {
            attribute: "typeName".to_string(),
            element: element.clone(),
        })
}

/// Decodes a `wfs:Property` pair. An absent or empty `Value` resets the
/// property, so the value stays an `Option` all the way through.
fn decode_property(cursor: &mut XmlCursor, property: &QName) -> Result<PropertyUpdate, DecodeError> {
    let mut name: Option<String> = None;
    let mut value: Option<String> = None;
    loop {
        cursor.next_tag()?;
        match cursor.token() {
            Token::Start(child) => {
                let child = child.clone();
                match child.local.as_str() {
                    "Name" => name = text_content(cursor)?,
                    "Value" => value = text_content(cursor)?,
                    _ => cursor.skip_subtree()?,
                }
            }
            Token::End(_) => break,
            _ => return Err(geosync_bxml::BxmlError::UnexpectedEof.into()),
        }
    }
    let name = name.ok_or_else(|| DecodeError::MissingElement {
        element: "Name".to_string(),
        parent: property.clone(),
    })?;
    Ok(PropertyUpdate { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geosync_decode::Decoder;
    use geosync_types::SpatialFilter;

    const NS_ATTRS: &str = r#"xmlns:wfs="http://www.opengis.net/wfs" xmlns:ogc="http://www.opengis.net/ogc" xmlns:gml="http://www.opengis.net/gml""#;

    fn decode_change(inner: &str) -> Result<Change, DecodeError> {
        let source = format!("<root {NS_ATTRS}>{inner}</root>");
        let mut cursor = XmlCursor::from_str(&source).unwrap();
        cursor.next_tag().unwrap();
        ChangeDecoder::new().decode(&mut cursor)
    }

    const POINT_FILTER: &str = "<ogc:Filter><ogc:Intersects><ogc:PropertyName>geom</ogc:PropertyName><gml:Point><gml:pos>1 1</gml:pos></gml:Point></ogc:Intersects></ogc:Filter>";

    #[test]
    fn test_insert_keeps_handle_and_skips_features() {
        let change = decode_change(
            r#"<wfs:Insert handle="batch-7"><feature><geom>ignored</geom></feature></wfs:Insert>"#,
        )
        .unwrap();
        assert_eq!(
            change,
            Change::Insert {
                handle: Some("batch-7".to_string())
            }
        );
    }

    #[test]
    fn test_update_with_properties_and_filter() {
        let change = decode_change(&format!(
            r#"<wfs:Update typeName="topp:roads"><wfs:Property><wfs:Name>surface</wfs:Name><wfs:Value>gravel</wfs:Value></wfs:Property><wfs:Property><wfs:Name>note</wfs:Name></wfs:Property>{POINT_FILTER}</wfs:Update>"#
        ))
        .unwrap();
        match change {
            Change::Update {
                type_name,
                properties,
                filter,
            } => {
                assert_eq!(type_name, "topp:roads");
                assert_eq!(properties, vec![
                    PropertyUpdate {
                        name: "surface".to_string(),
                        value: Some("gravel".to_string()),
                    },
                    PropertyUpdate {
                        name: "note".to_string(),
                        value: None,
                    },
                ]);
                assert!(matches!(filter, Some(SpatialFilter::Binary { .. })));
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn test_update_requires_type_name() {
        let err = decode_change("<wfs:Update></wfs:Update>").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingAttribute { attribute, .. } if attribute == "typeName"
        ));
    }

    #[test]
    fn test_delete_requires_filter() {
        let err = decode_change(r#"<wfs:Delete typeName="topp:roads"/>"#).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingElement { element, .. } if element == "Filter"
        ));
    }

    #[test]
    fn test_delete_with_filter() {
        let change = decode_change(&format!(
            r#"<wfs:Delete typeName="topp:roads">{POINT_FILTER}</wfs:Delete>"#
        ))
        .unwrap();
        match change {
            Change::Delete { type_name, filter } => {
                assert_eq!(type_name, "topp:roads");
                assert!(matches!(filter, SpatialFilter::Binary { .. }));
            }
            other => panic!("expected delete, got {:?}", other),
        }
    }

    #[test]
    fn test_property_requires_name() {
        let err = decode_change(
            r#"<wfs:Update typeName="t"><wfs:Property><wfs:Value>v</wfs:Value></wfs:Property></wfs:Update>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingElement { element, .. } if element == "Name"
        ));
    }
}
