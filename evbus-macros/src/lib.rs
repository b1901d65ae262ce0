use proc_macro::TokenStream;
use quote::quote;
use syn::{Item, parse_macro_input};

mod listeners;

/// 监听者宏
/// - 标注在固有 `impl` 块上，收集其中带 `#[listener]` 的方法
/// - 自动为目标类型实现 `::evbus::Listener` trait（`bind`）
/// - 处理方法签名必须为 `fn(&self, event: &E) -> R`，其中 `R` 为 `()` 或 `Result<(), impl Into<anyhow::Error>>`
#[proc_macro_attribute]
pub fn listeners(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new_spanned(
            proc_macro2::TokenStream::from(attr),
            "#[listeners] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let input = parse_macro_input!(item as Item);
    let item_impl = match input {
        Item::Impl(i) => i,
        other => {
            return syn::Error::new_spanned(other, "#[listeners] only on impl blocks")
                .to_compile_error()
                .into();
        }
    };

    match listeners::expand(item_impl) {
        Ok(ts) => ts.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// 处理方法标记
///
/// 仅在 `#[listeners]` 块内有意义，由外层宏消费；单独使用时报错。
#[proc_macro_attribute]
pub fn listener(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = proc_macro2::TokenStream::from(item);
    let err = syn::Error::new_spanned(
        &item,
        "#[listener] is only valid on methods inside a #[listeners] impl block",
    )
    .to_compile_error();

    TokenStream::from(quote! {
        #err
        #item
    })
}
