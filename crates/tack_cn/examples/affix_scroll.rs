//! Affix Scroll Demo
//!
//! Drives the widgets against the headless host:
//! - A toolbar pinned 10px from the top while the page scrolls
//! - A footer pinned to the bottom of a scroll container
//! - An inline menu collapsing with its sider
//! - A checkbox group
//!
//! Run with: RUST_LOG=tack_cn=debug cargo run -p tack_cn --example affix_scroll

use std::sync::Arc;

use tack_cn::prelude::*;
use tack_cn::{CheckboxConfig, MenuMotion};
use tack_core::{fixed_target, FlowBox, ScrollContainer};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ComponentConfig::from_toml_str(
        r#"
        theme = "dark"

        [prefix]
        affix = "demo-affix"
        "#,
    )?;
    let host = Host::new(1280.0, 800.0);
    let ctx = Context::root().provide(config);

    page_toolbar(&host, &ctx);
    container_footer(&host, &ctx);
    sider_menu(&host, &ctx);
    fruit_group(&host, &ctx);

    Ok(())
}

fn page_toolbar(host: &Host, ctx: &Context) {
    let viewport: Arc<dyn ScrollTarget> = host.viewport().clone();
    let layout = Rect::new(40.0, 300.0, 1200.0, 48.0);
    let placeholder = Arc::new(FlowBox::new(viewport.clone(), layout));
    let toolbar = Arc::new(FlowBox::new(viewport, layout));

    let affix = cn::affix()
        .offset_top(10.0)
        .on_change(|pinned| tracing::info!(pinned, "toolbar pinned state changed"))
        .build(host, ctx, AffixNodes::new(placeholder, toolbar));
    affix.mount();
    host.tick();

    for y in [0.0, 150.0, 309.0, 311.0, 600.0, 120.0] {
        host.viewport().scroll_to(0.0, y);
        host.tick();

        let render = affix.render();
        match render.affix {
            Some(style) => tracing::info!(y, css = %style.to_css(), class = %render.class_name, "toolbar"),
            None => tracing::info!(y, "toolbar in flow"),
        }
    }

    affix.unmount();
}

fn container_footer(host: &Host, ctx: &Context) {
    let container = Arc::new(ScrollContainer::new(Rect::new(0.0, 100.0, 600.0, 400.0)));
    let target: Arc<dyn ScrollTarget> = container.clone();
    let layout = Rect::new(0.0, 700.0, 600.0, 32.0);
    let node = Arc::new(FlowBox::new(target.clone(), layout));

    let affix = cn::affix()
        .offset_bottom(0.0)
        .target(fixed_target(target))
        .build(host, ctx, AffixNodes::new(node.clone(), node));
    affix.mount();
    host.tick();

    for y in [0.0, 200.0, 400.0] {
        container.scroll_to(0.0, y);
        host.tick();
        tracing::info!(y, bottom = ?affix.affix_style().and_then(|s| s.bottom()), "footer");
    }
}

fn sider_menu(host: &Host, ctx: &Context) {
    let expanded = ctx.provide(SiderCollapsed(false));
    let collapsed = ctx.provide(SiderCollapsed(true));

    let menu = cn::menu()
        .mode(MenuMode::Inline)
        .default_open_keys(["docs", "api"])
        .on_click(|click| tracing::info!(key = %click.key, "menu item clicked"))
        .build(host, &expanded);

    menu.item_click(ItemClick::new("docs-intro").key_path(["docs-intro", "docs"]));

    menu.update(cn::menu().mode(MenuMode::Inline), &collapsed);
    let render = menu.render();
    tracing::info!(mode = %render.mode, open = ?render.open_keys, class = %render.class_name, "collapsed");

    if let MenuMotion::Accordion(accordion) = &render.motion {
        accordion.leave(|| tracing::info!("inline leave animation finished"));
    }
    tracing::info!(mode = %menu.mode(), "after leave");

    menu.update(cn::menu().mode(MenuMode::Inline), &expanded);
    tracing::info!(open = ?menu.open_keys(), selected = ?menu.selected_keys(), "expanded");
}

fn fruit_group(host: &Host, ctx: &Context) {
    let group = cn::checkbox_group()
        .default_value(["apple"])
        .on_change(|values| tracing::info!(?values, "fruit selection"))
        .build(host);
    let group_ctx = group.provide(ctx);

    let fruits: Vec<Checkbox> = ["apple", "pear", "plum"]
        .into_iter()
        .map(|fruit| CheckboxConfig::new().value(fruit).label(fruit).build(host, &group_ctx))
        .collect();

    fruits[1].toggle();
    fruits[0].toggle();

    for fruit in &fruits {
        let render = fruit.render();
        tracing::info!(label = ?render.label, class = %render.input_class, "checkbox");
    }
}
