use datagen_spec::spec_json_schema;

fn main() {
    let schema = spec_json_schema();
    let json = serde_json::to_string_pretty(&schema).expect("serialize spec json schema");
    println!("{json}");
}
