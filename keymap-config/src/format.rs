use proc_macro2::TokenStream;
#[cfg(test)]
use quote::quote;

/// Format tokens of a whole file
pub fn pretty_file(tokens: TokenStream) -> anyhow::Result<String> {
    let file = tokens.to_string();
    let parsed = syn::parse_file(&file)
        .map_err(|e| anyhow::anyhow!("Failed to parse generated code: {}\n{}", e, file))?;
    Ok(prettyplease::unparse(&parsed))
}

/// Format expression tokens by placing them in a static item
#[cfg(test)]
pub fn pretty_expr(tokens: TokenStream) -> String {
    pretty_file(quote! { static EXPR: Expr = #tokens; }).unwrap()
}

#[cfg(test)]
pub fn assert_tokens_eq(left: TokenStream, right: TokenStream) {
    similar_asserts::assert_eq!(pretty_expr(left), pretty_expr(right));
}
