/**
 * Aggregation Tests
 *
 * Test suite for the corpus-wide collection of call and template variables
 */

#[cfg(test)]
mod tests {
    use qweb_compiler::template::merge_template_vars;
    use qweb_compiler::{aggregate_vars, update_template, CorpusVars, TemplateVars};

    fn names(vars: &TemplateVars, template: &str) -> Vec<String> {
        vars.get(template)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn aggregate(files: &[&str]) -> CorpusVars {
        let mut corpus = CorpusVars::default();
        for content in files {
            aggregate_vars(content, &mut corpus.outside_vars, &mut corpus.inside_vars).unwrap();
        }
        corpus
    }

    const CALLER: &str = r#"
<templates>
    <t t-name="web.Caller">
        <t t-call="web.Callee">
            <t t-set="title" t-value="props.title"/>
            <div><t t-set="nested" t-value="1"/></div>
        </t>
        <t t-call="web.Other"/>
    </t>
</templates>
"#;

    const CALLEE: &str = r#"
<templates>
    <t t-name="web.Callee">
        <h1 t-esc="title"/>
        <span t-esc="nested"/>
        <span t-esc="missing"/>
    </t>
</templates>
"#;

    #[test]
    fn should_collect_variables_set_inside_calls() {
        let corpus = aggregate(&[CALLER]);
        assert_eq!(names(&corpus.outside_vars, "web.Callee"), vec!["nested", "title"]);
        assert!(corpus.outside_vars.contains_key("web.Other"));
        assert!(names(&corpus.outside_vars, "web.Other").is_empty());
    }

    #[test]
    fn should_merge_calls_across_files() {
        let other_caller = r#"<t t-name="x"><t t-call="web.Callee"><t t-set="extra" t-value="2"/></t></t>"#;
        let corpus = aggregate(&[CALLER, other_caller]);
        assert_eq!(names(&corpus.outside_vars, "web.Callee"), vec!["extra", "nested", "title"]);
    }

    #[test]
    fn should_key_calls_by_their_raw_target() {
        let corpus = aggregate(&[r#"<t t-call="{{ tmpl }}"><t t-set="a" t-value="1"/></t>"#]);
        assert_eq!(names(&corpus.outside_vars, "{{ tmpl }}"), vec!["a"]);
    }

    #[test]
    fn should_collect_variables_of_named_templates() {
        let corpus = aggregate(&[r#"
<templates>
    <t t-name="web.ListView">
        <t t-set="total" t-value="0"/>
        <t t-foreach="records" t-as="record" t-foreach-index="idx">
            <t t-set="line" t-value="record.id"/>
        </t>
        <t t-for-each="groups" t-as="group"/>
        <t t-as="notALoop"/>
    </t>
</templates>
"#]);
        assert_eq!(
            names(&corpus.inside_vars, "web.ListView"),
            vec![
                "group",
                "group_first",
                "group_index",
                "group_last",
                "group_value",
                "idx",
                "line",
                "record",
                "record_first",
                "record_index",
                "record_last",
                "record_value",
                "total",
            ]
        );
    }

    #[test]
    fn should_identify_templates_by_id() {
        let corpus = aggregate(&[r#"<odoo><template id="website.layout"><t t-set="page" t-value="1"/></template></odoo>"#]);
        assert_eq!(names(&corpus.inside_vars, "website.layout"), vec!["page"]);
    }

    #[test]
    fn should_register_inheritance_targets() {
        let corpus = aggregate(&[r#"<t t-name="mine" t-inherit="web.ListView" t-inherit-mode="extension"/>"#]);
        assert!(corpus.inside_vars.contains_key("web.ListView"));
        assert!(corpus.inside_vars.contains_key("mine"));
    }

    #[test]
    fn should_keep_first_seen_template_order() {
        let corpus = aggregate(&[r#"<templates><t t-name="b"/><t t-name="a"/><t t-name="c"/></templates>"#]);
        let order: Vec<&str> = corpus.inside_vars.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn should_fail_on_malformed_files() {
        let mut corpus = CorpusVars::default();
        assert!(aggregate_vars("<t t-name=\"a\">", &mut corpus.outside_vars, &mut corpus.inside_vars).is_err());
    }

    #[test]
    fn should_feed_aggregated_variables_to_the_rewrite() {
        let corpus = aggregate(&[CALLER, CALLEE]);
        let result = update_template(CALLEE, &corpus.outside_vars, &corpus.inside_vars).unwrap();
        assert_eq!(
            result,
            r#"
<templates>
    <t t-name="web.Callee">
        <h1 t-esc="title"/>
        <span t-esc="nested"/>
        <span t-esc="this.missing"/>
    </t>
</templates>
"#
        );
    }

    #[test]
    fn should_feed_inherited_variables_to_patches() {
        let base = r#"<t t-name="web.Base"><t t-foreach="rows" t-as="row"><td t-esc="row.name"/></t></t>"#;
        let patch = r#"<t t-name="my.Patch" t-inherit="web.Base"><xpath expr="//td[@t-esc='row.name']" position="attributes"><attribute name="t-att-title">row_index + offset</attribute></xpath></t>"#;
        let corpus = aggregate(&[base, patch]);

        let result = update_template(patch, &corpus.outside_vars, &corpus.inside_vars).unwrap();
        assert_eq!(
            result,
            r#"<t t-name="my.Patch" t-inherit="web.Base"><xpath expr="//td[@t-esc='row.name']" position="attributes"><attribute name="t-att-title">row_index + this.offset</attribute></xpath></t>"#
        );
    }

    mod corpus_vars {
        use super::*;

        #[test]
        fn should_round_trip_through_json() {
            let corpus = aggregate(&[CALLER, CALLEE]);
            let json = corpus.to_json().unwrap();
            assert_eq!(CorpusVars::from_json(&json).unwrap(), corpus);
        }

        #[test]
        fn should_default_missing_maps() {
            let corpus = CorpusVars::from_json(r#"{"inside_vars": {"web.ListView": ["item"]}}"#).unwrap();
            assert!(corpus.outside_vars.is_empty());
            assert_eq!(names(&corpus.inside_vars, "web.ListView"), vec!["item"]);
        }

        #[test]
        fn should_merge_corpora() {
            let mut corpus = aggregate(&[CALLER]);
            let other = CorpusVars::from_json(r#"{"outside_vars": {"web.Callee": ["zeta"], "web.New": []}}"#).unwrap();
            corpus.merge(&other);
            assert_eq!(names(&corpus.outside_vars, "web.Callee"), vec!["nested", "title", "zeta"]);
            assert!(corpus.outside_vars.contains_key("web.New"));
        }

        #[test]
        fn should_merge_template_vars() {
            let mut vars = TemplateVars::new();
            vars.entry("a".to_string()).or_default().insert("x".to_string());
            let mut other = TemplateVars::new();
            other.entry("a".to_string()).or_default().insert("x".to_string());
            other.entry("a".to_string()).or_default().insert("y".to_string());

            merge_template_vars(&mut vars, &other);
            assert_eq!(names(&vars, "a"), vec!["x", "y"]);
        }
    }
}
