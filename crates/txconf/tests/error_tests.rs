//! Rejections: every failure aborts the whole parse

use txconf::{parse_str, parse_str_with_config, Config, ErrorKind, Version};

fn doc(version: Version, body: &str) -> String {
    format!(r#"<subsystem xmlns="{}">{body}</subsystem>"#, version.namespace())
}

fn kind_of(xml: &str) -> Option<ErrorKind> {
    parse_str(xml).err().map(|e| e.kind().clone())
}

#[test]
fn test_unknown_namespace() {
    let namespace = "urn:jboss:domain:transactions:3.0";
    let err = kind_of(&format!(r#"<subsystem xmlns="{namespace}"/>"#));
    assert_eq!(
        err,
        Some(ErrorKind::UnsupportedSchemaVersion {
            namespace: namespace.to_string()
        })
    );
}

#[test]
fn test_foreign_namespace() {
    let err = kind_of(r#"<subsystem xmlns="urn:jboss:domain:logging:1.0"/>"#);
    assert!(matches!(err, Some(ErrorKind::UnsupportedSchemaVersion { .. })));
}

#[test]
fn test_missing_recovery_socket_binding_is_named() {
    let result = parse_str(&doc(
        Version::V1_0,
        r#"<recovery-environment status-socket-binding="txn-status-manager"/>"#,
    ));
    let Err(err) = result else {
        panic!("recovery-environment without socket-binding must be rejected");
    };
    assert_eq!(
        err.kind(),
        &ErrorKind::MissingRequiredAttribute {
            attributes: vec!["socket-binding".to_string()],
            element: "recovery-environment".to_string(),
        }
    );
    assert!(err.to_string().contains("socket-binding"));
}

#[test]
fn test_duplicate_type_attribute() {
    let err = kind_of(&doc(
        Version::V2_1,
        r#"<object-store type="default" type="hornetq"/>"#,
    ));
    assert_eq!(
        err,
        Some(ErrorKind::DuplicateAttribute {
            attribute: "type".to_string(),
            element: "object-store".to_string(),
        })
    );
}

#[test]
fn test_duplicate_attribute_wins_over_value_checks() {
    let cases = [
        (Version::V2_1, r#"<object-store type="bogus" type="hornetq"/>"#, "type", "object-store"),
        (Version::V1_0, r#"<object-store type="x" type="y"/>"#, "type", "object-store"),
        (
            Version::V1_0,
            r#"<recovery-environment socket-binding="" socket-binding="a" status-socket-binding="s"/>"#,
            "socket-binding",
            "recovery-environment",
        ),
    ];
    for (version, body, attribute, element) in cases {
        assert_eq!(
            kind_of(&doc(version, body)),
            Some(ErrorKind::DuplicateAttribute {
                attribute: attribute.to_string(),
                element: element.to_string(),
            }),
            "{version}: {body}"
        );
    }
}

#[test]
fn test_type_unknown_before_2_1() {
    let err = kind_of(&doc(Version::V2_0, r#"<object-store type="default"/>"#));
    assert!(matches!(
        err,
        Some(ErrorKind::UnknownAttribute { attribute, .. }) if attribute == "type"
    ));
}

#[test]
fn test_enable_statistics_removed_in_2_0() {
    for version in [Version::V2_0, Version::V2_1] {
        let err = kind_of(&doc(version, r#"<coordinator-environment enable-statistics="true"/>"#));
        assert!(matches!(
            err,
            Some(ErrorKind::UnknownAttribute { attribute, .. }) if attribute == "enable-statistics"
        ));
    }
}

#[test]
fn test_statistics_alias_conflict() {
    let err = kind_of(&doc(
        Version::V1_2,
        r#"<coordinator-environment enable-statistics="true" statistics-enabled="true"/>"#,
    ));
    assert!(matches!(
        err,
        Some(ErrorKind::ParameterConflict { parameter, .. }) if parameter == "statistics-enabled"
    ));
}

#[test]
fn test_elements_from_later_versions_rejected() {
    let cases = [
        (Version::V1_0, "<jts/>"),
        (Version::V1_2, "<use-hornetq-store/>"),
        (Version::V1_3, r#"<jdbc-store datasource-jndi-name="ds"/>"#),
        (Version::V2_0, "<hornetq-store/>"),
    ];
    for (version, body) in cases {
        let err = kind_of(&doc(version, body));
        assert!(
            matches!(err, Some(ErrorKind::UnexpectedElement { .. })),
            "{version}: {body}"
        );
    }
}

#[test]
fn test_process_id_required_from_1_1() {
    let err = kind_of(&doc(Version::V1_1, r#"<core-environment node-identifier="1"/>"#));
    assert!(matches!(
        err,
        Some(ErrorKind::MissingRequiredContent { element, .. }) if element == "core-environment"
    ));
    let err = kind_of(&doc(
        Version::V2_1,
        "<core-environment><process-id/></core-environment>",
    ));
    assert!(matches!(
        err,
        Some(ErrorKind::MissingRequiredContent { element, .. }) if element == "process-id"
    ));
}

#[test]
fn test_process_id_not_allowed_in_1_0() {
    let err = kind_of(&doc(
        Version::V1_0,
        "<core-environment><process-id><uuid/></process-id></core-environment>",
    ));
    assert!(matches!(err, Some(ErrorKind::UnexpectedContent { .. })));
}

#[test]
fn test_second_process_id_branch() {
    let err = kind_of(&doc(
        Version::V1_1,
        r#"<core-environment><process-id><uuid/><socket socket-binding="s"/></process-id></core-environment>"#,
    ));
    assert!(matches!(
        err,
        Some(ErrorKind::UnexpectedElement { element, context }) if element == "socket" && context == "process-id"
    ));
}

#[test]
fn test_socket_requires_binding() {
    let err = kind_of(&doc(
        Version::V1_1,
        r#"<core-environment><process-id><socket socket-process-id-max-ports="3"/></process-id></core-environment>"#,
    ));
    assert!(matches!(
        err,
        Some(ErrorKind::MissingRequiredAttribute { attributes, element })
            if attributes == ["socket-binding"] && element == "socket"
    ));
}

#[test]
fn test_store_backends_are_exclusive() {
    let cases = [
        (
            Version::V1_4,
            r#"<use-hornetq-store/><jdbc-store datasource-jndi-name="ds"/>"#,
        ),
        (
            Version::V2_1,
            r#"<jdbc-store datasource-jndi-name="ds"/><hornetq-store/>"#,
        ),
    ];
    for (version, body) in cases {
        let err = kind_of(&doc(version, body));
        assert!(
            matches!(err, Some(ErrorKind::UnexpectedElement { .. })),
            "{version}: {body}"
        );
    }
}

#[test]
fn test_ignored_element_still_validated() {
    let err = kind_of(&doc(
        Version::V2_1,
        r#"<use-hornetq-store enable-async-io="maybe"/>"#,
    ));
    assert!(matches!(err, Some(ErrorKind::InvalidAttributeValue { .. })));

    let err = kind_of(&doc(Version::V2_1, r#"<use-hornetq-store path="x"/>"#));
    assert!(matches!(err, Some(ErrorKind::UnknownAttribute { .. })));

    let err = kind_of(&doc(Version::V2_1, "<use-hornetq-store><jts/></use-hornetq-store>"));
    assert!(matches!(err, Some(ErrorKind::UnexpectedContent { .. })));
}

#[test]
fn test_jdbc_store_requires_datasource() {
    let err = kind_of(&doc(Version::V1_4, "<jdbc-store><action/></jdbc-store>"));
    assert!(matches!(
        err,
        Some(ErrorKind::MissingRequiredAttribute { attributes, .. })
            if attributes == ["datasource-jndi-name"]
    ));
}

#[test]
fn test_jdbc_children_at_most_once() {
    let err = kind_of(&doc(
        Version::V2_1,
        r#"<jdbc-store datasource-jndi-name="ds"><state/><state/></jdbc-store>"#,
    ));
    assert!(matches!(
        err,
        Some(ErrorKind::UnexpectedElement { element, .. }) if element == "state"
    ));
}

#[test]
fn test_invalid_values() {
    let cases = [
        r#"<coordinator-environment default-timeout="-5"/>"#,
        r#"<coordinator-environment default-timeout="soon"/>"#,
        r#"<coordinator-environment statistics-enabled="1"/>"#,
        r#"<object-store type="journal"/>"#,
        r#"<object-store path=""/>"#,
        r#"<core-environment node-identifier="${unclosed"><process-id><uuid/></process-id></core-environment>"#,
    ];
    for body in cases {
        let err = kind_of(&doc(Version::V2_1, body));
        assert!(
            matches!(err, Some(ErrorKind::InvalidAttributeValue { .. })),
            "{body}"
        );
    }
}

#[test]
fn test_foreign_namespace_child() {
    let err = kind_of(&doc(
        Version::V2_1,
        r#"<jts xmlns="urn:jboss:domain:transactions:2.0"/>"#,
    ));
    assert!(matches!(err, Some(ErrorKind::UnexpectedElement { .. })));
}

#[test]
fn test_prefixed_attribute_unknown() {
    let err = kind_of(&doc(
        Version::V2_1,
        r#"<object-store xmlns:x="urn:x" x:path="p"/>"#,
    ));
    assert!(matches!(err, Some(ErrorKind::UnknownAttribute { .. })));
}

#[test]
fn test_truncated_and_malformed() {
    let err = kind_of(r#"<subsystem xmlns="urn:jboss:domain:transactions:2.1"><jts/>"#);
    assert!(matches!(err, Some(ErrorKind::TruncatedInput { .. })));

    let err = kind_of(r#"<subsystem xmlns="urn:jboss:domain:transactions:2.1"><jts></subsystem>"#);
    assert!(matches!(err, Some(ErrorKind::MismatchedEndElement { .. })));

    let err = kind_of(r#"<subsystem xmlns="urn:jboss:domain:transactions:2.1"><jts/"#);
    assert!(matches!(err, Some(ErrorKind::InvalidToken)));
}

#[test]
fn test_text_content_rejected() {
    let err = kind_of(&doc(Version::V2_1, "text"));
    assert!(matches!(
        err,
        Some(ErrorKind::UnexpectedContent { element, .. }) if element == "subsystem"
    ));
}

#[test]
fn test_limits() {
    let xml = doc(Version::V2_1, "<jdbc-store datasource-jndi-name=\"ds\"><action/></jdbc-store>");
    let err = parse_str_with_config(&xml, Config::new(2, 0)).err();
    assert!(matches!(
        err.map(|e| e.kind().clone()),
        Some(ErrorKind::MaxDepthExceeded { max: 2 })
    ));
    let err = parse_str_with_config(&xml, Config::new(0, 16)).err();
    assert!(matches!(
        err.map(|e| e.kind().clone()),
        Some(ErrorKind::MaxSizeExceeded { max: 16 })
    ));
    assert!(parse_str_with_config(&xml, Config::unlimited()).is_ok());
}

#[test]
fn test_error_position_points_at_element() {
    let xml = "<subsystem xmlns=\"urn:jboss:domain:transactions:2.1\">\n    <journal/>\n</subsystem>";
    let err = parse_str(xml).err();
    let line = err.map(|e| e.span().start.line);
    assert_eq!(line, Some(2));
}
