mod common;

use common::{STORE_COMPACT, STORE_HEADING, init_tracing};
use webagent::codegen::context::{EXECUTE_JS_TOOL, context_for_llm, execute_js_schema};
use webagent::codegen::{GenerationError, generate_typescript};
use webagent::parser::parse;
use webagent::{Manifest, Param, Tool};

const STORE_DECLARATION: &str = "declare const global: {
  /**
   * Search the catalog.
   *
   * @param query - Search text.
   * @param limit - Max results. (default: 20)
   */
  searchProducts(query: string, limit?: number): Promise<{ products: Array<{ id: string; name: string; price: number }>; total: number }>;

  /**
   * Add a product to the cart.
   *
   * @param productId - Product identifier.
   * @param quantity - How many to add. (default: 1)
   */
  addToCart(productId: string, quantity?: number): Promise<{ cartId: string; items: number }>;
};
";

#[test]
fn store_manifest_end_to_end() {
    init_tracing();
    for source in [STORE_HEADING, STORE_COMPACT] {
        let ts = generate_typescript(&parse(source).unwrap()).unwrap();
        assert_eq!(ts.matches("): Promise<").count(), 2);
        assert_eq!(ts, STORE_DECLARATION);
    }
}

#[test]
fn optional_marker_matches_required_flag() {
    let manifest = parse(
        "tool: book(room, date, nights=1, note?, guests=2)
  params:
    room: string
    date: string
    note: string
    guests: number
",
    )
    .unwrap();
    let ts = generate_typescript(&manifest).unwrap();
    for param in &manifest.tools[0].params {
        let optional = format!("{}?:", param.name);
        assert_eq!(ts.contains(&optional), !param.required, "{}", param.name);
    }
    assert!(ts.contains("book(room: string, date: string, nights?: number, note?: string, guests?: number)"));
}

#[test]
fn compact_params_map_infers_optionality() {
    let manifest = parse("tool: search(query, limit=20)\n  params: {query: string, limit: number?}\n").unwrap();
    let limit = manifest.tools[0].param("limit").unwrap();
    assert!(!limit.required);
    assert_eq!(limit.default.as_deref(), Some("20"));

    let ts = generate_typescript(&manifest).unwrap();
    assert!(ts.contains("  search(query: string, limit?: number): Promise<any>;"));
    assert!(ts.contains("   * @param limit - (default: 20)\n"));
}

#[test]
fn heading_tool_without_output_returns_any() {
    let manifest = parse("# S\n\n## getBasket\nView basket.\n\n### Params\n").unwrap();
    let ts = generate_typescript(&manifest).unwrap();
    assert_eq!(
        ts,
        "declare const global: {\n  /**\n   * View basket.\n   */\n  getBasket(): Promise<any>;\n};\n"
    );
}

#[test]
fn blank_names_fail_generation() {
    let manifest = Manifest {
        tools: vec![Tool {
            name: "search".into(),
            params: vec![Param::required(" ", "string")],
            ..Tool::default()
        }],
        ..Manifest::default()
    };
    assert_eq!(
        generate_typescript(&manifest),
        Err(GenerationError::EmptyParamName {
            tool: "search".into(),
            index: 0
        })
    );
}

#[test]
fn llm_context_bundles_declarations_and_prose() {
    let manifest = parse(STORE_HEADING).unwrap();
    let context = context_for_llm(&manifest).unwrap();
    assert!(context.starts_with(STORE_DECLARATION));
    assert!(context.contains("Rate limit: 10 requests per minute."));

    let schema = execute_js_schema();
    assert_eq!(schema["function"]["name"], EXECUTE_JS_TOOL);
}
