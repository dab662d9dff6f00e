use leptos::prelude::*;
use leptos_shortcuts::ShortcutRegistry;

/// Table of the shortcuts currently registered
#[component]
pub fn ShortcutsHelp(registry: ShortcutRegistry) -> impl IntoView {
    let rows = registry
        .shortcuts()
        .into_iter()
        .map(|shortcut| {
            view! {
                <tr>
                    <td><kbd>{shortcut.label()}</kbd></td>
                    <td>{shortcut.description.clone()}</td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <table class="shortcuts-table">
            <tbody>{rows}</tbody>
        </table>
        <p class="muted">"Shortcuts are ignored while typing, except Esc."</p>
    }
}
