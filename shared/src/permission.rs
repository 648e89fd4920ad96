use crate::action_result::ActionResult;
use crate::env::ExecutionContext;
use crate::lang;
use crate::storage_type::{EditCategory, StorageType};
use crate::text::Text;

/// Decides whether the player behind `context` may edit a config of the
/// given storage type. This is the single authority for the decision; both
/// sides call it, but only the server-side answer is binding. The
/// client-side verdict gates UI navigation and must be re-checked by the
/// server before any mutation is committed.
pub fn can_player_edit(storage: StorageType, context: &ExecutionContext) -> ActionResult {
    if context.is_client() {
        return match storage.edit_category() {
            EditCategory::DedicatedOnly => ActionResult::fail(),
            EditCategory::Local => ActionResult::success(),
            EditCategory::ServerScoped => {
                if context.is_main_menu() || context.is_singleplayer() {
                    return ActionResult::success();
                }
                if context.is_playing_on_lan() {
                    // LAN hosts are not assumed to run the companion plugin,
                    // so only the host themselves may touch server configs.
                    return if context.is_integrated_server_owned_by_player() {
                        ActionResult::success()
                    } else {
                        ActionResult::fail_with(Text::translatable(lang::LAN_SERVER))
                    };
                }
                if context.is_playing_on_remote_server() {
                    return if context.is_player_an_operator() && context.is_developer_player() {
                        ActionResult::success()
                    } else {
                        ActionResult::fail_with(Text::translatable(lang::NO_DEVELOPER_STATUS))
                    };
                }
                ActionResult::fail_with(Text::translatable(lang::NO_PERMISSION))
            }
        };
    }
    if context.is_dedicated_server() {
        return match storage.edit_category() {
            // Client-local and dedicated-only configs are never editable
            // through a remote connection.
            EditCategory::Local | EditCategory::DedicatedOnly => ActionResult::fail(),
            EditCategory::ServerScoped => {
                // Operator alone is too broad a permission for rewriting
                // server configuration; the administrator must also have
                // opted the player into the developer allow-list.
                if context.is_player_an_operator() && context.is_developer_player() {
                    ActionResult::success()
                } else {
                    ActionResult::fail()
                }
            }
        };
    }
    ActionResult::fail()
}
