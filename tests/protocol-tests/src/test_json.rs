//! JSON protocol scenarios.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use rustack_protocol_core::{OperationBinding, ProtocolConfig, ProtocolError, SdkHttpResponse};
    use rustack_protocol_json::JsonProtocolFactory;

    use crate::model::{AllTypes, ItemsInput};
    use crate::{body_text, echo_response, init_tracing, ok_response, payload_binding};

    fn factory() -> JsonProtocolFactory {
        JsonProtocolFactory::new(ProtocolConfig::default())
    }

    fn binding() -> OperationBinding {
        payload_binding("DynamoDB", http::Method::POST, "/")
    }

    #[test]
    fn test_should_round_trip_every_value_kind() {
        init_tracing();
        let factory = factory();
        let binding = binding();
        let input = AllTypes::sample();

        let request = factory
            .create_protocol_marshaller(&binding)
            .marshall(&input)
            .expect("marshalled");
        let output: AllTypes = factory
            .create_response_unmarshaller(&binding)
            .unmarshall(&echo_response(&request))
            .expect("unmarshalled");

        assert_eq!(output, input);
        assert_eq!(
            request.header("content-type"),
            Some("application/x-amz-json-1.1")
        );
    }

    #[test]
    fn test_should_marshall_items_scenario() {
        init_tracing();
        let factory = factory();
        let binding = binding();
        let input = ItemsInput {
            items: Some(vec!["s1".to_owned(), "s2".to_owned()]),
        };

        let request = factory
            .create_protocol_marshaller(&binding)
            .marshall(&input)
            .expect("marshalled");
        assert_eq!(body_text(&request).expect("body"), r#"{"Items":["s1","s2"]}"#);

        let response = ok_response(Bytes::from_static(br#"{"Items":["s1","s2"]}"#));
        let output: ItemsInput = factory
            .create_response_unmarshaller(&binding)
            .unmarshall(&response)
            .expect("unmarshalled");
        assert_eq!(output, input);
    }

    #[test]
    fn test_should_drop_null_members_of_sparse_list() {
        let factory = factory();
        let binding = binding();
        let response = ok_response(Bytes::from_static(br#"{"Items":["a",null]}"#));

        let output: ItemsInput = factory
            .create_response_unmarshaller(&binding)
            .unmarshall(&response)
            .expect("unmarshalled");
        assert_eq!(output.items, Some(vec!["a".to_owned()]));
    }

    #[test]
    fn test_should_write_empty_object_for_empty_input() {
        let factory = factory();
        let binding = binding();

        let request = factory
            .create_protocol_marshaller(&binding)
            .marshall(&ItemsInput::default())
            .expect("marshalled");
        assert_eq!(body_text(&request).expect("body"), "{}");
        assert_eq!(request.header("content-length"), Some("2"));
    }

    #[test]
    fn test_should_skip_unknown_members_and_nulls() {
        let factory = factory();
        let binding = binding();
        let response = ok_response(Bytes::from_static(
            br#"{"Future":{"a":[1,2]},"StringMember":null,"IntegerMember":7}"#,
        ));

        let output: AllTypes = factory
            .create_response_unmarshaller(&binding)
            .unmarshall(&response)
            .expect("unmarshalled");
        assert_eq!(
            output,
            AllTypes {
                integer_member: Some(7),
                ..AllTypes::default()
            }
        );
    }

    #[test]
    fn test_should_fail_on_malformed_body() {
        let factory = factory();
        let binding = binding();
        let response = SdkHttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            Bytes::from_static(br#"{"Items":["s1""#),
        );

        let err = factory
            .create_response_unmarshaller(&binding)
            .unmarshall::<ItemsInput>(&response)
            .expect_err("truncated JSON");
        assert!(matches!(err, ProtocolError::MalformedStream { format: "JSON", .. }));
    }
}
