use htmlbind_lib::{
    check_shapes, from_fragment, Decode, Error, Html, Scope, Shape, Unsupported,
};

#[derive(Debug, Default, Decode)]
struct Mixed {
    #[html(selector = "h1")]
    pub before: String,
    #[html(selector = "span")]
    pub count: u32,
    #[html(selector = "p")]
    pub after: String,
}

#[derive(Debug, Default, Decode)]
#[allow(dead_code)]
struct Numbers {
    #[html(selector = "li")]
    pub values: Vec<u32>,
}

#[derive(Debug, Default, Decode)]
#[allow(dead_code)]
struct TextReference {
    #[html(selector = "h1")]
    pub title: Option<Box<String>>,
}

#[derive(Debug, Default, Decode)]
struct Outer {
    #[html(selector = "h1")]
    pub title: String,
    #[html(selector = "div")]
    pub inner: Mixed,
}

const PAGE: &str = "<h1>head</h1><div><h1>inner</h1><span>3</span><p>tail</p></div>";

#[test]
fn unsupported_field_stops_the_decode_at_that_field() {
    let html = Html::parse_fragment(PAGE);
    let mut mixed = Mixed {
        after: "untouched".to_string(),
        ..Default::default()
    };
    let error = Scope::document(&html).decode_into(&mut mixed).unwrap_err();

    assert!(matches!(
        error,
        Error::UnsupportedFieldType {
            field: "count",
            ty: "u32"
        }
    ));
    assert!(error.to_string().contains("count"));
    assert_eq!(mixed.before, "head");
    assert_eq!(mixed.count, 0);
    assert_eq!(mixed.after, "untouched");
}

#[test]
fn unsupported_shapes_fail_without_matching_content() {
    let error = from_fragment::<Mixed>("").unwrap_err();
    assert_eq!(error.field(), Some("count"));
}

#[test]
fn sequence_of_non_text_is_rejected() {
    let error = from_fragment::<Numbers>("<li>1</li>").unwrap_err();
    assert!(matches!(
        error,
        Error::UnsupportedSequenceElementType { field: "values", .. }
    ));
}

#[test]
fn reference_to_non_record_is_rejected() {
    let error = from_fragment::<TextReference>("<h1>t</h1>").unwrap_err();
    assert!(matches!(
        error,
        Error::UnsupportedReferenceTarget { field: "title", .. }
    ));
}

#[test]
fn nested_errors_propagate_unchanged() {
    let html = Html::parse_fragment(PAGE);
    let mut outer = Outer::default();
    let error = Scope::document(&html).decode_into(&mut outer).unwrap_err();

    assert!(matches!(
        error,
        Error::UnsupportedFieldType { field: "count", .. }
    ));
    assert_eq!(outer.title, "head");
    // the failed nested record is never assigned
    assert_eq!(outer.inner.before, "");
}

#[test]
fn descriptors_record_the_mismatch() {
    assert_eq!(
        Mixed::FIELDS[1].shape,
        Shape::Unsupported(Unsupported::Field)
    );
    assert_eq!(
        Numbers::FIELDS[0].shape,
        Shape::Unsupported(Unsupported::SequenceElement)
    );
    assert_eq!(
        TextReference::FIELDS[0].shape,
        Shape::Unsupported(Unsupported::ReferenceTarget)
    );
}

#[derive(Debug, Default, Decode)]
#[allow(dead_code)]
struct Bad {
    #[html(selector = "span")]
    pub n: u32,
}

#[derive(Debug, Default, Decode)]
struct Holder {
    #[html(selector = "h1")]
    pub title: String,
    #[html(selector = "div")]
    pub bad: Bad,
    #[html(selector = "p")]
    pub after: String,
}

#[derive(Debug, Default, Decode)]
struct BadReference {
    #[html(selector = "div")]
    pub bad: Option<Box<Bad>>,
}

#[test]
fn nested_shape_errors_do_not_depend_on_matches() {
    for html in ["<h1>t</h1><p>x</p>", "<h1>t</h1><div></div><p>x</p>"] {
        let document = Html::parse_fragment(html);
        let mut holder = Holder::default();
        let error = Scope::document(&document)
            .decode_into(&mut holder)
            .unwrap_err();
        assert!(matches!(error, Error::UnsupportedFieldType { field: "n", .. }));
        assert_eq!(holder.title, "t");
        assert_eq!(holder.after, "");
    }

    for html in ["<p/>", "<div></div>"] {
        let error = from_fragment::<BadReference>(html).unwrap_err();
        assert!(matches!(error, Error::UnsupportedFieldType { field: "n", .. }));
        let error = from_fragment::<TextReference>(html).unwrap_err();
        assert!(matches!(error, Error::UnsupportedReferenceTarget { .. }));
    }
}

#[test]
fn shapes_can_be_checked_without_a_document() {
    assert!(check_shapes::<Holder>().is_err());
    assert!(matches!(
        check_shapes::<BadReference>(),
        Err(Error::UnsupportedFieldType { field: "n", .. })
    ));
    assert!(matches!(
        check_shapes::<Numbers>(),
        Err(Error::UnsupportedSequenceElementType { .. })
    ));
}

#[test]
fn error_messages_name_the_type_as_written() {
    let error = from_fragment::<TextReference>("").unwrap_err();
    assert!(matches!(
        error,
        Error::UnsupportedReferenceTarget {
            ty: "Option<Box<String>>",
            ..
        }
    ));
    assert!(error.to_string().contains("Option<Box<String>>"));
}

#[test]
fn standard_wrappers_are_unsupported_fields() {
    #[derive(Debug, Default, Decode)]
    #[allow(dead_code)]
    struct Wrapped {
        #[html(selector = "h1")]
        pub title: String,
        #[html(selector = "p")]
        pub body: std::borrow::Cow<'static, str>,
        #[html(selector = "p")]
        pub shared: std::rc::Rc<String>,
    }

    let error = from_fragment::<Wrapped>("<h1>t</h1><p>x</p>").unwrap_err();
    assert!(matches!(
        error,
        Error::UnsupportedFieldType {
            field: "body",
            ty: "std::borrow::Cow<'static, str>"
        }
    ));
    assert_eq!(Wrapped::FIELDS[2].shape, Shape::Unsupported(Unsupported::Field));
}
