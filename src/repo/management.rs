// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{accounts, categories, currencies};
use crate::context::AppContext;
use crate::errors::LedgerResult;
use crate::models::ManagedItem;

/// Everything the user manages, grouped by kind: accounts, then each group
/// followed by its sub-categories, then currencies (main first).
pub fn management_items(ctx: &AppContext) -> LedgerResult<Vec<ManagedItem>> {
    let mut items: Vec<ManagedItem> = accounts::list_accounts(ctx)?
        .into_iter()
        .map(ManagedItem::Account)
        .collect();

    let all = categories::list_categories_and_groups(ctx)?;
    let (groups, subs): (Vec<_>, Vec<_>) = all.into_iter().partition(|c| c.is_group());
    for g in groups {
        let gid = g.id;
        items.push(ManagedItem::Group(g));
        items.extend(
            subs.iter()
                .filter(|c| c.parent_id == Some(gid))
                .cloned()
                .map(ManagedItem::Category),
        );
    }

    items.extend(
        currencies::list_currencies(ctx)?
            .into_iter()
            .map(ManagedItem::Currency),
    );
    Ok(items)
}
