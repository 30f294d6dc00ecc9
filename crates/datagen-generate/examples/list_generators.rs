use datagen_generate::GeneratorCatalog;

fn main() {
    let catalog = GeneratorCatalog::new();
    for tag in catalog.tags() {
        if let Ok(factory) = catalog.resolve(tag) {
            println!("{tag}\t{}", factory.value_type());
        }
    }
}
