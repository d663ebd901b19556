/**
 * ML Parser Tests
 *
 * Test suite for markup parsing and byte-preserving serialization
 */

#[cfg(test)]
mod tests {
    use qweb_compiler::ml_parser::{tokenize, Document, Element, Node, Parser, TokenType};
    use qweb_compiler::CompileError;

    fn parse(source: &str) -> Document {
        Document::parse(source, "TestComp").unwrap()
    }

    fn root(document: &Document) -> &Element {
        document.root_elements().next().unwrap()
    }

    fn parse_errors(source: &str) -> Vec<String> {
        Parser::new()
            .parse(source, "TestComp")
            .errors
            .into_iter()
            .map(|e| e.msg)
            .collect()
    }

    mod tokens {
        use super::*;

        #[test]
        fn should_tokenize_tags_and_attributes() {
            let types: Vec<TokenType> = tokenize("<div a='1'>x</div>", "TestComp")
                .tokens
                .iter()
                .map(|t| t.token_type)
                .collect();
            assert_eq!(
                types,
                vec![
                    TokenType::TagOpenStart,
                    TokenType::AttrName,
                    TokenType::AttrValue,
                    TokenType::TagOpenEnd,
                    TokenType::Text,
                    TokenType::TagClose,
                    TokenType::Eof,
                ]
            );
        }

        #[test]
        fn should_keep_attribute_names_with_modifiers() {
            let result = tokenize(r#"<div t-on-click.stop.prevent="f" xml:space="preserve"/>"#, "TestComp");
            assert!(result.errors.is_empty());
            let names: Vec<&str> = result
                .tokens
                .iter()
                .filter(|t| t.token_type == TokenType::AttrName)
                .map(|t| t.part(0))
                .collect();
            assert_eq!(names, vec!["t-on-click.stop.prevent", "xml:space"]);
        }
    }

    mod elements {
        use super::*;

        #[test]
        fn should_parse_nested_elements() {
            let document = parse("<templates><t t-name=\"a\"><div/></t><t t-name=\"b\"/></templates>");
            let templates = root(&document);
            assert_eq!(templates.name, "templates");

            let names: Vec<&str> = templates
                .child_elements()
                .filter_map(|t| t.get_attr("t-name"))
                .collect();
            assert_eq!(names, vec!["a", "b"]);
        }

        #[test]
        fn should_list_elements_in_document_order() {
            let document = parse("<a><b><c/></b><d/></a><e/>");
            let names: Vec<&str> = document.elements().map(|e| e.name.as_str()).collect();
            assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
        }

        #[test]
        fn should_keep_attribute_order_and_quotes() {
            let document = parse(r#"<div b="1" a='2'/>"#);
            let div = root(&document);
            assert_eq!(div.attrs[0].name, "b");
            assert_eq!(div.attrs[0].quote, '"');
            assert_eq!(div.attrs[1].name, "a");
            assert_eq!(div.attrs[1].quote, '\'');
        }

        #[test]
        fn should_decode_attribute_values() {
            let document = parse(r#"<div t-if="a &amp;&amp; b &lt; c" t-esc="'&#8203;'"/>"#);
            let div = root(&document);
            assert_eq!(div.get_attr("t-if"), Some("a && b < c"));
            assert_eq!(div.get_attr("t-esc"), Some("'\u{200b}'"));
        }

        #[test]
        fn should_keep_quotes_of_the_other_kind() {
            let document = parse(r#"<div t-att-title="state ? 'a' : 'b'"/>"#);
            assert_eq!(root(&document).get_attr("t-att-title"), Some("state ? 'a' : 'b'"));
        }

        #[test]
        fn should_parse_multiline_attributes() {
            let document = parse("<div\n    class=\"x\"\n    t-if=\"y\"\n>\n</div>");
            let div = root(&document);
            assert_eq!(div.attrs.len(), 2);
            assert_eq!(div.attrs[1].value_span.start.line, 2);
        }

        #[test]
        fn should_read_the_leading_text() {
            let document = parse("<attribute name=\"t-if\">a or b</attribute>");
            assert_eq!(root(&document).text(), Some("a or b"));

            let document = parse("<attribute name=\"t-if\"><b/>a</attribute>");
            assert_eq!(root(&document).text(), None);
        }

        #[test]
        fn should_parse_comments_and_processing_instructions() {
            let document = parse("<?xml version=\"1.0\"?>\n<!-- c --><a/>");
            assert!(matches!(document.root_nodes[0], Node::ProcessingInstruction(_)));
            assert!(document
                .root_nodes
                .iter()
                .any(|node| matches!(node, Node::Comment(c) if c.value == " c ")));
        }

        #[test]
        fn should_parse_cdata_as_text() {
            let document = parse("<script><![CDATA[if (a < b) {}]]></script>");
            match &root(&document).children[0] {
                Node::Text(text) => {
                    assert!(text.cdata);
                    assert_eq!(text.value, "if (a < b) {}");
                }
                other => panic!("unexpected node: {:?}", other),
            }
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn should_report_unclosed_elements() {
            assert_eq!(parse_errors("<a><b/>"), vec!["Unclosed element \"a\""]);
        }

        #[test]
        fn should_report_unexpected_closing_tags() {
            assert!(parse_errors("<a></b></a>").contains(&"Unexpected closing tag \"b\"".to_string()));
        }

        #[test]
        fn should_report_unknown_entities() {
            let errors = parse_errors("<a>&nbsp;</a>");
            assert_eq!(errors[0], "Unknown entity \"&nbsp;\"");
        }

        #[test]
        fn should_report_duplicate_attributes() {
            assert_eq!(
                parse_errors(r#"<div t-esc="x" class="a" t-esc="y"/>"#),
                vec!["Duplicate attribute \"t-esc\""]
            );
            assert!(Document::parse(r#"<div t-esc="x" t-esc="y"/>"#, "TestComp").is_err());
        }

        #[test]
        fn should_stop_at_the_first_lexer_error() {
            let errors = parse_errors("<a><!-- x</a>");
            assert_eq!(errors, vec!["Unterminated comment", "Unclosed element \"a\""]);
        }

        #[test]
        fn should_fail_document_parsing_on_errors() {
            match Document::parse("<a>", "TestComp") {
                Err(CompileError::Markup { errors }) => assert_eq!(errors.len(), 1),
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }

    mod serializer {
        use super::*;

        const TEMPLATES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<templates id="template" xml:space="preserve">

    <!-- the main view -->
    <t t-name="web.Main"   owl="1">
        <div class="o_main"
             t-att-class="{ 'o_active': state.active }"
             t-if='props.items.length &gt; 0 &amp;&amp; env.isSmall'>
            <span>Total:&#160;<t t-esc="total"/></span>
            <![CDATA[ raw < text ]]>
        </div>
    </t>

</templates>
"#;

        #[test]
        fn should_reproduce_unmodified_documents() {
            assert_eq!(parse(TEMPLATES).serialize(), TEMPLATES);
        }

        #[test]
        fn should_only_rewrite_modified_values() {
            let mut document = parse(r#"<div  a = "x"   b='y'>text</div>"#);
            for div in document.root_elements_mut() {
                div.set_attr("b", "this.y".to_string());
            }
            assert_eq!(document.serialize(), r#"<div  a = "x"   b='this.y'>text</div>"#);
        }

        #[test]
        fn should_keep_references_of_rewritten_values() {
            let mut document = parse(r#"<div t-if="a &amp;&amp; b"/>"#);
            for div in document.root_elements_mut() {
                div.set_attr("t-if", "this.a && this.b".to_string());
            }
            assert_eq!(document.serialize(), r#"<div t-if="this.a &amp;&amp; this.b"/>"#);
        }

        #[test]
        fn should_escape_new_special_characters() {
            let mut document = parse(r#"<div a="x" b='y'/>"#);
            for div in document.root_elements_mut() {
                div.set_attr("a", "\"<&".to_string());
                div.set_attr("b", "'\"".to_string());
            }
            assert_eq!(document.serialize(), r#"<div a="&quot;&lt;&amp;" b='&apos;"'/>"#);
        }

        #[test]
        fn should_rewrite_text() {
            let mut document = parse("<attribute name=\"t-if\">a &amp;&amp; b</attribute>");
            for attribute in document.root_elements_mut() {
                attribute.set_text("this.a && this.b".to_string());
            }
            assert_eq!(
                document.serialize(),
                "<attribute name=\"t-if\">this.a &amp;&amp; this.b</attribute>"
            );
        }

        #[test]
        fn should_keep_non_ascii_text() {
            let source = "<div title=\"café\">naïve &#8203; ✓</div>";
            assert_eq!(parse(source).serialize(), source);
        }
    }
}
