#[macro_export]
macro_rules! regex {
    ($pat:expr) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Declare a main rule.
///
/// ```ignore
/// rule! {
///     name: "ru/dash/centuries",
///     settings: { "dash" => "\u{2014}" },
///     handler: |text, settings, _ctx| { ... }
/// }
/// ```
#[macro_export]
macro_rules! rule {
    (
        name: $name:expr
        $(, title: $title:expr)?
        $(, sort_index: $sort_index:expr)?
        $(, enabled: $enabled:expr)?
        $(, settings: { $($key:expr => $value:expr),* $(,)? })?
        , handler: |$text:pat_param, $settings:pat_param, $ctx:pat_param| $body:block
        $(,)?
    ) => {{
        #[allow(unused_mut)]
        let mut rule = $crate::RuleDefinition::new(
            $name,
            ::std::sync::Arc::new(
                move |$text: &str, $settings: &$crate::Settings, $ctx: &$crate::RuleContext<'_>| -> String { $body },
            ),
        );
        $(rule = rule.with_title($title);)?
        $(rule = rule.with_sort_index($sort_index);)?
        $(rule = rule.with_enabled($enabled);)?
        $($(rule = rule.with_setting($key, $value);)*)?
        rule
    }};
}

/// Declare an inner rule, optionally bound to a queue.
#[macro_export]
macro_rules! inner_rule {
    (
        name: $name:expr
        $(, title: $title:expr)?
        $(, sort_index: $sort_index:expr)?
        $(, queue: $queue:expr)?
        , handler: |$text:pat_param, $settings:pat_param, $ctx:pat_param| $body:block
        $(,)?
    ) => {{
        #[allow(unused_mut)]
        let mut rule = $crate::InnerRuleDefinition::new(
            $name,
            ::std::sync::Arc::new(
                move |$text: &str, $settings: &$crate::Settings, $ctx: &$crate::RuleContext<'_>| -> String { $body },
            ),
        );
        $(rule = rule.with_title($title);)?
        $(rule = rule.with_sort_index($sort_index);)?
        $(rule = rule.with_queue($queue);)?
        rule
    }};
}
