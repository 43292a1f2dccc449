//! End-to-end template lowering through `compile`.

#[cfg(test)]
mod tests {
    use crate::parse::{compile, CompileMetadata, CompileOptions};

    fn compile_jsx(source: &str) -> String {
        compile(
            source,
            &CompileMetadata::module("view.jsx"),
            &CompileOptions::default(),
        )
        .unwrap()
        .code
    }

    /// Drops all whitespace so assertions don't depend on printer layout.
    fn squash(code: &str) -> String {
        code.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_element_with_reactive_child() {
        let code = compile_jsx(r#"const view = <div class="a">{x.get}</div>;"#);
        let flat = squash(&code);

        assert!(code.contains("element as _element"));
        assert!(code.contains("appendText as _appendText"));
        assert!(code.contains("reactivePart as _reactivePart"));
        assert!(code.contains("eventDelegate as _eventDelegate"));
        assert!(code.contains("from \"@rumious/browser\""));
        assert_eq!(code.matches("import").count(), 1);

        assert!(flat.contains("constview=(_ctx)=>{"));
        assert!(flat.contains("const_root=document.createDocumentFragment();"));
        assert!(flat.contains(r#"const_ele=_element(_root,_ctx,"div",{"class":"a"});"#));
        assert!(flat.contains("_reactivePart(_ctx,_ele,()=>x.get,[x]);"));
        assert!(flat.contains("return_root;"));
        assert!(flat.trim_end().ends_with("_eventDelegate([]);"));
        assert_eq!(flat.matches("_element(").count(), 1);
        assert!(!code.contains("<div"));
    }

    #[test]
    fn test_imports_precede_user_code() {
        let code = compile_jsx("import { signal } from \"./state\";\nconst v = <p />;");
        let runtime = code.find("@rumious/browser").unwrap();
        let user = code.find("./state").unwrap();
        assert!(runtime < user);
    }

    #[test]
    fn test_props_shapes() {
        let flat = squash(&compile_jsx(
            r#"const v = <input disabled value={name} data-id="7" {...rest} />;"#,
        ));
        assert!(flat.contains(r#"{"disabled":true,"value":name,"data-id":"7",...rest}"#));
    }

    #[test]
    fn test_non_reactive_child_is_passed_raw() {
        let code = compile_jsx("const v = <p>Hello {name}!</p>;");
        let flat = squash(&code);
        assert!(code.contains("_appendText(_ele, \"Hello \")"));
        assert!(flat.contains("_reactivePart(_ctx,_ele,name,[]);"));
        assert!(flat.contains(r#"_appendText(_ele,"!");"#));
    }

    #[test]
    fn test_whitespace_only_text_emits_nothing_when_collapsed() {
        let flat = squash(&compile_jsx(
            "const v = <div compile:preserveWhitespace={false}>\n  <span />\n</div>;",
        ));
        assert!(flat.contains("appendTextas_appendText"));
        assert!(!flat.contains("_appendText("));
    }

    #[test]
    fn test_text_flushes_around_empty_container() {
        let flat = squash(&compile_jsx("const v = <p>a{/* note */}b</p>;"));
        assert!(flat.contains(r#"_appendText(_ele,"a");_appendText(_ele,"b");"#));
    }

    #[test]
    fn test_text_entities_are_decoded() {
        let code = compile_jsx("const t = <p>a &amp; b &lt; c &#65;&#x42;</p>;");
        assert!(code.contains("_appendText(_ele, \"a & b < c AB\")"));
        assert!(!code.contains("&amp;"));
    }

    #[test]
    fn test_string_attribute_entities_are_decoded() {
        let code = compile_jsx(r#"const t = <p title="x &amp; y" data-raw="&unknown;" />;"#);
        assert!(code.contains(r#""title": "x & y""#));
        assert!(code.contains(r#""data-raw": "&unknown;""#));
    }

    #[test]
    fn test_entities_decode_before_whitespace_collapse() {
        let code = compile_jsx(
            "const t = <p compile:preserveWhitespace={false}>  a&#32;&#32;b  </p>;",
        );
        assert!(code.contains("_appendText(_ele, \"a b\")"));
    }

    #[test]
    fn test_non_ascii_text_is_kept() {
        let code = compile_jsx("const t = <p>héllo wörld</p>;");
        assert!(code.contains("héllo wörld"));
    }

    #[test]
    fn test_whitespace_modes() {
        let collapsed = compile_jsx(
            "const v = <div compile:preserveWhitespace={false}>\n   foo\n   bar\n</div>;",
        );
        assert!(collapsed.contains("\"foo bar\""));

        let smart = compile_jsx(
            "const v = <div compile:preserveWhitespace=\"smart\">\n   foo\n   bar\n</div>;",
        );
        assert!(smart.contains("\"foo bar\""));

        let preserved = compile_jsx("const v = <div>  foo  </div>;");
        assert!(preserved.contains("\"  foo  \""));
    }

    #[test]
    fn test_whitespace_override_applies_to_subtree_only() {
        let code = compile_jsx(
            "const v = <div><p compile:preserveWhitespace={false}>  a  </p><p>  b  </p></div>;",
        );
        assert!(code.contains("\"a\""));
        assert!(code.contains("\"  b  \""));
    }

    #[test]
    fn test_nested_elements_anchor_to_parent() {
        let flat = squash(&compile_jsx("const v = <ul><li>one</li><li>two</li></ul>;"));
        assert!(flat.contains(r#"const_ele=_element(_root,_ctx,"ul",{});"#));
        assert!(flat.contains(r#"const_ele2=_element(_ele,_ctx,"li",{});"#));
        assert!(flat.contains(r#"_appendText(_ele2,"one");"#));
        assert!(flat.contains(r#"const_ele3=_element(_ele,_ctx,"li",{});"#));
        assert!(flat.contains(r#"_appendText(_ele3,"two");"#));

        let first = flat.find(r#""one""#).unwrap();
        let second = flat.find(r#"const_ele3"#).unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_bind_directive() {
        let flat = squash(&compile_jsx("const v = <input bind:value={text.get} />;"));
        assert!(flat.contains("_reactiveCallback(_ctx,(value)=>_ele.value=value,()=>text.get,[text]);"));
        assert!(flat.contains(r#"const_ele=_element(_root,_ctx,"input",{});"#));
    }

    #[test]
    fn test_bind_directive_with_non_identifier_property() {
        let flat = squash(&compile_jsx("const v = <input bind:aria-label={label} />;"));
        assert!(flat.contains(r#"_ele["aria-label"]=value"#));
        assert!(flat.contains(",label,[]);"));
    }

    #[test]
    fn test_attr_directive() {
        let flat = squash(&compile_jsx("const v = <a attr:href={url.get} />;"));
        assert!(flat.contains(r#"(value)=>_ele.setAttribute("href",value)"#));
        assert!(flat.contains("()=>url.get,[url]"));
    }

    #[test]
    fn test_event_directive_and_delegation() {
        let flat = squash(&compile_jsx(
            "const v = <div><button on:click={save} /><input on:input={sync} on:click={other} /></div>;",
        ));
        assert!(flat.contains(r#"_createEvent(_ctx,_ele2,"click",save);"#));
        assert!(flat.contains(r#"_createEvent(_ctx,_ele3,"input",sync);"#));
        assert!(flat.contains(r#"_eventDelegate(["click","input","click"]);"#));
    }

    #[test]
    fn test_directive_statements_follow_declaration() {
        let flat = squash(&compile_jsx("const v = <button on:click={go}>Go</button>;"));
        let decl = flat.find("const_ele=").unwrap();
        let event = flat.find("_createEvent(").unwrap();
        let text = flat.find(r#"_appendText(_ele,"Go")"#).unwrap();
        assert!(decl < event && event < text);
    }

    #[test]
    fn test_ref_view_model_directives() {
        let flat = squash(&compile_jsx(
            "const v = <div><input ref={field} model={value} /><section view={page} /></div>;",
        ));
        assert!(flat.contains("_ref(_ctx,_ele2,field);"));
        assert!(flat.contains("_detectValueChange((_value)=>_setStateValue(value,_value),_ele2);"));
        assert!(flat.contains("_view(_ctx,_ele3,page);"));
    }

    #[test]
    fn test_custom_directive() {
        let flat = squash(&compile_jsx("const v = <div foo:bar={x} />;"));
        assert!(flat.contains(r#"_directives.foo(_ctx,_ele,"bar",x);"#));
    }

    #[test]
    fn test_custom_directive_reactive_value_is_raw() {
        let flat = squash(&compile_jsx("const v = <div tooltip:top={msg.get} />;"));
        assert!(flat.contains(r#"_directives.tooltip(_ctx,_ele,"top",msg.get);"#));
    }

    #[test]
    fn test_top_level_fragment() {
        let flat = squash(&compile_jsx("const v = <><span /><b /></>;"));
        assert!(flat.contains(r#"_element(_root,_ctx,"span",{})"#));
        assert!(flat.contains(r#"_element(_root,_ctx,"b",{})"#));
    }

    #[test]
    fn test_nested_jsx_in_expression_is_lowered_separately() {
        let code = compile_jsx("const v = <ul>{items.map((i) => <li>{i}</li>)}</ul>;");
        let flat = squash(&code);
        assert!(!code.contains("<li"));
        assert!(flat.contains("(_ctx2)=>{"));
        assert!(flat.contains(r#"_element(_root2,_ctx2,"li",{})"#));
        assert_eq!(code.matches("import").count(), 1);
    }

    #[test]
    fn test_jsx_attribute_value_is_lowered_as_template() {
        let code = compile_jsx("const v = <Layout header={<h1>Title</h1>} />;");
        let flat = squash(&code);
        assert!(!code.contains("<h1"));
        assert!(flat.contains(r#""header":(_ctx2)=>{"#));
    }

    #[test]
    fn test_generated_names_avoid_user_names() {
        let flat = squash(&compile_jsx(
            "const _element = 1; const _root = 2; const v = <div />;",
        ));
        assert!(flat.contains("elementas_element2"));
        assert!(flat.contains("const_root2=document.createDocumentFragment();"));
        assert!(flat.contains(r#"_element2(_root2,_ctx,"div",{})"#));
    }

    #[test]
    fn test_each_template_gets_fresh_scope() {
        let flat = squash(&compile_jsx("const a = <i />; const b = <u />;"));
        assert!(flat.contains(r#"_element(_root,_ctx,"i",{})"#));
        assert!(flat.contains(r#"_element(_root2,_ctx2,"u",{})"#));
        assert_eq!(flat.matches("elementas_element").count(), 1);
    }

    #[test]
    fn test_custom_environment() {
        let code = compile(
            "const v = <p />;",
            &CompileMetadata::module("view.jsx"),
            &CompileOptions {
                environment: "@rumious/server".to_string(),
                verbose: false,
            },
        )
        .unwrap()
        .code;
        assert!(code.contains("from \"@rumious/server\""));
        assert!(!code.contains("@rumious/browser"));
    }

    #[test]
    fn test_file_without_jsx_still_gets_delegation() {
        let flat = squash(&compile_jsx("const x = 1;"));
        assert!(flat.contains("eventDelegateas_eventDelegate"));
        assert!(flat.ends_with("_eventDelegate([]);"));
    }
}
