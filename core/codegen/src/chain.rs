use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{bracketed, parenthesized, parse_macro_input, token, Expr, Ident, Lit, Token};

// Must equal `chainable::RESERVED`. Exposed through `__reserved_names!`.
const RESERVED: &[&str] = &[
    "prefix",
    "suffix",
    "separator",
    "sanitize",
    "sanitize_links",
    "handle_link_invocation",
    "invocable_links",
    "tokens",
    "property",
    "to_string",
];

pub fn chain_impl(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as ChainInput);
    proc_macro::TokenStream::from(expand(input))
}

pub fn reserved_names_impl(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    if !input.is_empty() {
        return syn::Error::new(Span::call_site(), "expected no arguments")
            .to_compile_error()
            .into();
    }

    let names = RESERVED.iter();
    let expanded = quote!({
        const NAMES: &[&str] = &[#(#names),*];
        NAMES
    });

    proc_macro::TokenStream::from(expanded)
}

enum Segment {
    Name(String, Span),
    Call(Punctuated<Expr, Token![,]>, Span),
}

struct ChainInput {
    base: TokenStream,
    segments: Vec<Segment>,
}

fn segment_name(name: String, span: Span) -> syn::Result<Segment> {
    if RESERVED.contains(&name.as_str()) {
        let msg = format!("`{}` is an intrinsic chain member and can't be a path segment", name);
        return Err(syn::Error::new(span, msg));
    }

    Ok(Segment::Name(name, span))
}

fn literal_name(lit: &Lit) -> syn::Result<String> {
    let name = match lit {
        Lit::Str(s) => s.value(),
        Lit::Int(i) => i.base10_digits().to_string(),
        Lit::Float(f) => f.base10_digits().to_string(),
        Lit::Char(c) => c.value().to_string(),
        Lit::Bool(b) => b.value.to_string(),
        _ => {
            let msg = "expected a string, integer, float, character, or boolean literal";
            return Err(syn::Error::new(lit.span(), msg));
        }
    };

    Ok(name)
}

impl Parse for ChainInput {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let base = if input.peek(token::Paren) {
            let content;
            parenthesized!(content in input);
            let expr: Expr = content.parse()?;
            quote!((#expr))
        } else {
            let ident = Ident::parse_any(input)?;
            quote!(#ident)
        };

        let mut segments = vec![];
        while !input.is_empty() {
            if input.peek(Token![.]) {
                input.parse::<Token![.]>()?;
                let ident = Ident::parse_any(input)?;
                segments.push(segment_name(ident.unraw().to_string(), ident.span())?);
            } else if input.peek(token::Bracket) {
                let content;
                bracketed!(content in input);
                let lit: Lit = content.parse()?;
                if !content.is_empty() {
                    return Err(content.error("expected a single literal"));
                }

                segments.push(segment_name(literal_name(&lit)?, lit.span())?);
            } else if input.peek(token::Paren) {
                let content;
                let paren = parenthesized!(content in input);
                let args = content.parse_terminated(Expr::parse)?;
                segments.push(Segment::Call(args, paren.span));
            } else {
                return Err(input.error("expected `.name`, `[literal]`, or `(arguments)`"));
            }
        }

        Ok(ChainInput { base, segments })
    }
}

fn expand(input: ChainInput) -> TokenStream {
    let ChainInput { base, segments } = input;
    if segments.is_empty() {
        return quote!(::chainable::Link::clone(&#base));
    }

    let mut expr = base;
    let mut fallible = false;
    for segment in segments {
        expr = match (segment, fallible) {
            (Segment::Name(name, span), false) => quote_spanned!(span => #expr.at(#name)),
            (Segment::Name(name, span), true) => {
                quote_spanned!(span => #expr.map(|__link| __link.at(#name)))
            }
            (Segment::Call(args, span), was_fallible) => {
                let args = args.iter().map(|arg| quote!(::chainable::Value::from(#arg)));
                let call = quote! {
                    invoke::<::std::vec::Vec<::chainable::Value>, ::chainable::Value>(
                        ::std::vec![#(#args),*]
                    )
                };
                fallible = true;
                match was_fallible {
                    false => quote_spanned!(span => #expr.#call),
                    true => quote_spanned!(span => #expr.and_then(|__link| __link.#call)),
                }
            }
        };
    }

    expr
}
