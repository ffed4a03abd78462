//! Typed delegates bound as console commands
//!
//! Any `Fn` closure of up to seven parameters can back a command as long as
//! every parameter type has a registered type proxy. Proxies are resolved when
//! the command is registered; console arguments are parsed on each call.

use super::command::{BoundProxy, CommandExecutor};
use super::CommandArgs;
use crate::errors::Result;
use crate::format::FormatProvider;
use crate::log_console;
use crate::type_proxies::{TypeProxy, TypeProxyRegistry};
use convar_core_types::schema::{EVENT_PARSE_FAILED, EVENT_USAGE};
use std::any::type_name;
use std::rc::Rc;

/// A closure that can be bound to a command through type proxies
///
/// `Args` is the tuple of parameter types; it only exists to keep the
/// implementations for different arities apart.
pub trait ProxyDelegate<Args>: 'static {
    /// Number of console arguments the delegate takes
    fn arity(&self) -> usize;

    /// Parameter type names, e.g. `(f32, alloc::string::String)`
    fn signature(&self) -> String;

    /// Resolve the parameter proxies and produce the executor
    ///
    /// # Errors
    ///
    /// Returns `CommandError::MissingTypeProxy` when a parameter type has no
    /// registered proxy.
    fn bind(self, registry: &TypeProxyRegistry, provider: Rc<FormatProvider>)
        -> Result<CommandExecutor>;
}

pub(crate) fn bind_proxy<F, Args>(
    delegate: F,
    registry: &TypeProxyRegistry,
    provider: Rc<FormatProvider>,
) -> Result<BoundProxy>
where
    F: ProxyDelegate<Args>,
{
    let signature = delegate.signature();
    let executor = delegate.bind(registry, provider)?;
    Ok(BoundProxy {
        signature,
        executor,
    })
}

fn check_arity(args: &CommandArgs, expected: usize) -> bool {
    let received = args.len();
    if received < expected {
        log_console!(
            "proxy_command",
            EVENT_USAGE,
            command = args.name();
            "Not enough arguments for proxy command {}: {} expected, got {}",
            args.name(),
            expected,
            received
        );
        return false;
    }
    if received > expected {
        log_console!(
            "proxy_command",
            EVENT_USAGE,
            command = args.name();
            "Too many arguments for proxy command {}: {} expected, got {}",
            args.name(),
            expected,
            received
        );
        return false;
    }
    true
}

fn parse_argument<T: 'static>(
    proxy: &dyn TypeProxy<T>,
    provider: &FormatProvider,
    args: &CommandArgs,
    index: usize,
) -> Option<T> {
    let parsed = args
        .get(index)
        .and_then(|text| proxy.try_parse(text, provider));
    if parsed.is_none() {
        log_console!(
            "proxy_command",
            EVENT_PARSE_FAILED,
            command = args.name();
            "Proxy command {}: could not convert argument {} to type {}",
            args.name(),
            index,
            type_name::<T>()
        );
    }
    parsed
}

macro_rules! count_params {
    () => { 0usize };
    ($head:ident $($tail:ident)*) => { 1usize + count_params!($($tail)*) };
}

macro_rules! proxy_delegate {
    ($($ty:ident $proxy:ident $value:ident),*) => {
        impl<Func, $($ty,)*> ProxyDelegate<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) + 'static,
            $($ty: 'static,)*
        {
            fn arity(&self) -> usize {
                count_params!($($ty)*)
            }

            fn signature(&self) -> String {
                let names: Vec<&'static str> = vec![$(type_name::<$ty>()),*];
                format!("({})", names.join(", "))
            }

            #[allow(unused_variables, unused_mut, unused_assignments)]
            fn bind(
                self,
                registry: &TypeProxyRegistry,
                provider: Rc<FormatProvider>,
            ) -> Result<CommandExecutor> {
                $(let $proxy = registry.get::<$ty>()?;)*
                Ok(Rc::new(move |args: &CommandArgs| {
                    if !check_arity(args, count_params!($($ty)*)) {
                        return;
                    }
                    let mut index = 0usize;
                    $(
                        let Some($value) = parse_argument(&*$proxy, &provider, args, index) else {
                            return;
                        };
                        index += 1;
                    )*
                    let _ = index;
                    (self)($($value),*);
                }))
            }
        }
    };
}

proxy_delegate!();
proxy_delegate!(A pa a);
proxy_delegate!(A pa a, B pb b);
proxy_delegate!(A pa a, B pb b, C pc c);
proxy_delegate!(A pa a, B pb b, C pc c, D pd d);
proxy_delegate!(A pa a, B pb b, C pc c, D pd d, E pe e);
proxy_delegate!(A pa a, B pb b, C pc c, D pd d, E pe e, F pf f);
proxy_delegate!(A pa a, B pb b, C pc c, D pd d, E pe e, F pf f, G pg g);
