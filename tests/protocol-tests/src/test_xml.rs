//! REST-XML protocol scenarios.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use bytes::Bytes;
    use rustack_protocol_core::{
        DynamicStruct, FieldDescriptor, Location, OperationBinding, ProtocolConfig, ProtocolError,
        Value, ValueKind,
    };
    use rustack_protocol_xml::{XmlProtocolFactory, XmlProtocolUnmarshaller};

    use crate::model::{AllTypes, Owner, PutXmlTypesInput, S3_NAMESPACE, XmlTypes};
    use crate::{body_text, echo_response, explicit_payload_binding, init_tracing, ok_response};

    static ALL_TYPES_PAYLOAD_FIELDS: [FieldDescriptor; 1] = [FieldDescriptor::new(
        "AllTypes",
        Location::Payload,
        ValueKind::Nested,
        "AllTypes",
    )
    .as_payload()
    .with_constructor(AllTypes::construct)];

    fn factory() -> XmlProtocolFactory {
        XmlProtocolFactory::new(ProtocolConfig::builder().xml_declaration(false).build())
    }

    fn put_binding() -> OperationBinding {
        explicit_payload_binding("S3", http::Method::PUT, "/{Bucket}?xmltypes")
    }

    fn xml_types() -> XmlTypes {
        XmlTypes {
            flattened_list_of_strings: Some(vec![
                "s1".to_owned(),
                "s2".to_owned(),
                "s3".to_owned(),
            ]),
            non_flattened_list_with_location: Some(vec!["i1".to_owned()]),
            flatmap: Some(BTreeMap::from([
                ("a1".to_owned(), "b1".to_owned()),
                ("a2".to_owned(), "b2".to_owned()),
            ])),
            owner: Some(Owner {
                owner_type: Some("CanonicalUser".to_owned()),
                id: Some("75aa57f09aa0c8caeab4f8c24e99d10f".to_owned()),
            }),
        }
    }

    #[test]
    fn test_should_round_trip_every_value_kind() {
        init_tracing();
        let factory = XmlProtocolFactory::default();
        let binding = explicit_payload_binding("S3", http::Method::PUT, "/");
        let sample = AllTypes::sample();
        let input = DynamicStruct::new(&ALL_TYPES_PAYLOAD_FIELDS)
            .with("AllTypes", Value::nested(sample.clone()));

        let request = factory
            .create_protocol_marshaller(&binding)
            .marshall(&input)
            .expect("marshalled");
        let body = body_text(&request).expect("body");
        assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?><AllTypes>"));
        assert!(
            body.contains("<Struct><Value>x</Value></Struct><Struct><Value>y</Value></Struct>")
        );
        assert!(!body.contains("<StructList>"));
        assert!(body.contains("<EpochMember>1705314600.250</EpochMember>"));
        assert!(body.contains("<TimestampMember>2024-01-15T10:30:00.000Z</TimestampMember>"));

        let output: AllTypes = XmlProtocolUnmarshaller::new(&binding)
            .unmarshall(&echo_response(&request))
            .expect("unmarshalled");
        assert_eq!(output, sample);
    }

    #[test]
    fn test_should_write_flattened_collections_as_siblings() {
        init_tracing();
        let factory = factory();
        let binding = put_binding();
        let input = PutXmlTypesInput {
            bucket: "photos".to_owned(),
            xml_types: Some(xml_types()),
        };

        let request = factory
            .create_protocol_marshaller(&binding)
            .marshall(&input)
            .expect("marshalled");

        assert_eq!(request.path_and_query(), "/photos?xmltypes");
        assert_eq!(
            body_text(&request).expect("body"),
            format!(
                "<XmlTypes xmlns=\"{S3_NAMESPACE}\">\
                 <FlattenedListOfStrings>s1</FlattenedListOfStrings>\
                 <FlattenedListOfStrings>s2</FlattenedListOfStrings>\
                 <FlattenedListOfStrings>s3</FlattenedListOfStrings>\
                 <NonFlattenedListWithLocation><item>i1</item></NonFlattenedListWithLocation>\
                 <entry><thekey>a1</thekey><thevalue>b1</thevalue></entry>\
                 <entry><thekey>a2</thekey><thevalue>b2</thevalue></entry>\
                 <Owner Type=\"CanonicalUser\"><ID>75aa57f09aa0c8caeab4f8c24e99d10f</ID></Owner>\
                 </XmlTypes>"
            )
        );

        let output: XmlTypes = XmlProtocolUnmarshaller::new(&binding)
            .unmarshall(&echo_response(&request))
            .expect("unmarshalled");
        assert_eq!(output, xml_types());
    }

    #[test]
    fn test_should_decode_flatmap_regardless_of_entry_order() {
        let binding = put_binding();
        let response = ok_response(Bytes::from_static(
            b"<XmlTypes>\
              <entry><thevalue>b2</thevalue><thekey>a2</thekey></entry>\
              <FlattenedListOfStrings>s1</FlattenedListOfStrings>\
              <entry><thekey>a1</thekey><thevalue>b1</thevalue></entry>\
              </XmlTypes>",
        ));

        let output: XmlTypes = XmlProtocolUnmarshaller::new(&binding)
            .unmarshall(&response)
            .expect("unmarshalled");
        assert_eq!(
            output.flatmap,
            Some(BTreeMap::from([
                ("a1".to_owned(), "b1".to_owned()),
                ("a2".to_owned(), "b2".to_owned()),
            ]))
        );
        assert_eq!(output.flattened_list_of_strings, Some(vec!["s1".to_owned()]));
    }

    #[test]
    fn test_should_reject_conflicting_namespace_before_writing() {
        let factory = factory();
        let binding = OperationBinding::builder()
            .request_uri("/{Bucket}")
            .http_method(http::Method::PUT)
            .service_name("S3")
            .has_payload_members(true)
            .has_explicit_payload_member(true)
            .xml_namespace_uri("urn:other")
            .build();
        let input = PutXmlTypesInput {
            bucket: "photos".to_owned(),
            xml_types: Some(xml_types()),
        };

        let err = factory
            .create_protocol_marshaller(&binding)
            .marshall(&input)
            .expect_err("two namespaces");
        assert!(matches!(err, ProtocolError::AmbiguousNamespace { .. }));
    }

    #[test]
    fn test_should_accept_matching_namespace() {
        let factory = factory();
        let binding = OperationBinding::builder()
            .request_uri("/{Bucket}")
            .http_method(http::Method::PUT)
            .service_name("S3")
            .has_payload_members(true)
            .has_explicit_payload_member(true)
            .xml_namespace_uri(S3_NAMESPACE)
            .build();
        let input = PutXmlTypesInput {
            bucket: "photos".to_owned(),
            xml_types: Some(XmlTypes::default()),
        };

        let request = factory
            .create_protocol_marshaller(&binding)
            .marshall(&input)
            .expect("marshalled");
        assert_eq!(
            body_text(&request).expect("body"),
            format!("<XmlTypes xmlns=\"{S3_NAMESPACE}\"></XmlTypes>")
        );
    }

    #[test]
    fn test_should_fail_on_truncated_document() {
        let binding = put_binding();
        let response = ok_response(Bytes::from_static(
            b"<XmlTypes><FlattenedListOfStrings>s1</FlattenedListOfStrings>",
        ));

        let err = XmlProtocolUnmarshaller::new(&binding)
            .unmarshall::<XmlTypes>(&response)
            .expect_err("truncated");
        assert!(matches!(err, ProtocolError::MalformedStream { format: "XML", .. }));
    }
}
