use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, LitStr, Result as SynResult, Type};

// 一个处理方法解析后的要素
struct Handler {
    ident: Ident,
    event_ty: Type,
}

pub(crate) fn expand(mut item_impl: ItemImpl) -> SynResult<TokenStream2> {
    if let Some((_, path, _)) = &item_impl.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[listeners] only on inherent impl blocks",
        ));
    }

    let mut handlers = Vec::new();
    let mut errors: Option<syn::Error> = None;
    let mut push_err = |e: syn::Error| match errors.as_mut() {
        Some(acc) => acc.combine(e),
        None => errors = Some(e),
    };

    for item in item_impl.items.iter_mut() {
        let ImplItem::Fn(method) = item else { continue };

        // 取出并移除 #[listener] 标记，其余属性原样保留
        let before = method.attrs.len();
        method.attrs.retain(|a| !is_listener_attr(a));
        if method.attrs.len() == before {
            continue;
        }

        match parse_handler(method) {
            Ok(h) => handlers.push(h),
            Err(e) => push_err(e),
        }
    }

    if let Some(e) = errors {
        return Err(e);
    }

    let self_ty = &item_impl.self_ty;
    let (impl_generics, _, where_clause) = item_impl.generics.split_for_impl();

    let registrations = handlers.iter().map(|h| {
        let ident = &h.ident;
        let event_ty = &h.event_ty;
        let name = LitStr::new(&ident.to_string(), ident.span());
        quote! {
            binder.on::<#event_ty, _>(#name, |this: &Self, event: &#event_ty| {
                ::evbus::IntoHandlerResult::into_handler_result(Self::#ident(this, event))
            });
        }
    });

    Ok(quote! {
        #item_impl

        impl #impl_generics ::evbus::Listener for #self_ty #where_clause {
            #[allow(unused_variables)]
            fn bind(
                binder: &mut ::evbus::Binder<Self>,
            ) -> ::evbus::__private::anyhow::Result<()> {
                #(#registrations)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

fn is_listener_attr(attr: &syn::Attribute) -> bool {
    let path = attr.path();
    path.is_ident("listener")
        || path
            .segments
            .last()
            .map(|s| s.ident == "listener")
            .unwrap_or(false)
}

// 校验签名：fn(&self, event: &E) -> R，且无泛型、非 async
fn parse_handler(method: &ImplItemFn) -> SynResult<Handler> {
    let sig = &method.sig;

    if sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            &sig.asyncness,
            "#[listener] methods must not be async",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "#[listener] methods must not be generic",
        ));
    }

    const RECEIVER: &str = "#[listener] methods must take `&self`";
    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(r)) if r.reference.is_some() && r.mutability.is_none() => {}
        Some(other) => return Err(syn::Error::new_spanned(other, RECEIVER)),
        None => return Err(syn::Error::new_spanned(&sig.ident, RECEIVER)),
    }

    let args: Vec<&FnArg> = inputs.collect();
    let [FnArg::Typed(arg)] = args.as_slice() else {
        return Err(syn::Error::new_spanned(
            &sig.ident,
            format!(
                "#[listener] method `{}` must take exactly one event argument, found {}",
                sig.ident,
                args.len()
            ),
        ));
    };

    let event_ty = match arg.ty.as_ref() {
        Type::Reference(r) if r.mutability.is_none() => (*r.elem).clone(),
        other => {
            return Err(syn::Error::new_spanned(
                other,
                "#[listener] event argument must be a shared reference `&E`",
            ));
        }
    };

    Ok(Handler {
        ident: sig.ident.clone(),
        event_ty,
    })
}
