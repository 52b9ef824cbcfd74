//! Tiles for the pages of the navigation menu.

use super::{definition, export_config, import_config};
use crate::error::WidgetResult;
use crate::factory::WidgetFactory;
use crate::page::{ChildSlot, NodeId, Page};
use crate::widget::{CommonConfig, Widget, WidgetCore};
use metaui_model::UxonObject;
use serde::{Deserialize, Serialize};

pub const WIDGET_TYPE: &str = "NavTiles";

const TILES: ChildSlot = ChildSlot::many("tiles");

pub(crate) const SLOTS: &[ChildSlot] = &[TILES];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavTilesConfig {
    /// Menu level to show, the top level when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_page_alias: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NavTiles {
    core: WidgetCore,
    config: NavTilesConfig,
}

impl Widget for NavTiles {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn export_config(&self) -> WidgetResult<UxonObject> {
        export_config(&self.config)
    }

    fn accepts_children(&self) -> bool {
        true
    }
}

pub(crate) fn build(
    widget_type: &'static str,
    common: CommonConfig,
    uxon: UxonObject,
) -> WidgetResult<Box<dyn Widget>> {
    Ok(Box::new(NavTiles {
        core: WidgetCore::from_common(widget_type, common),
        config: import_config(widget_type, &uxon)?,
    }))
}

/// Generate one tile per menu item unless tiles were defined.
pub(crate) fn finish(factory: &WidgetFactory, page: &mut Page, node: NodeId) -> WidgetResult<()> {
    if !page.children(node)?.is_empty() {
        return Ok(());
    }
    let Some(navigation) = factory.navigation() else {
        tracing::debug!("No navigation source, {} stays empty", node);
        return Ok(());
    };
    let parent = page
        .widget::<NavTiles>(node)
        .and_then(|w| w.config.parent_page_alias.clone());

    for item in navigation.menu_items(parent.as_deref()) {
        let mut tile = definition("Tile");
        tile.insert("caption", item.caption);
        tile.insert("page_alias", item.page_alias);
        if let Some(hint) = item.hint {
            tile.insert("hint", hint);
        }
        if let Some(icon) = item.icon {
            tile.insert("icon", icon);
        }
        factory.build(page, Some(node), TILES, tile)?;
    }
    Ok(())
}
