// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};

use crate::context::AppContext;
use crate::errors::{BackendContext, LedgerError, LedgerResult};
use crate::models::{Category, CategoryUpdate, ParentRef};
use crate::validate;

fn row_to_category(r: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        parent_id: r.get(2)?,
    })
}

pub(crate) fn find(conn: &Connection, user_id: i64, id: i64) -> LedgerResult<Option<Category>> {
    conn.query_row(
        "SELECT id, name, parent_id FROM categories WHERE user_id=?1 AND id=?2",
        params![user_id, id],
        row_to_category,
    )
    .optional()
    .op("Failed to load category.")
}

fn check_parent(conn: &Connection, user_id: i64, parent: ParentRef) -> LedgerResult<Option<i64>> {
    let Some(pid) = parent.id() else {
        return Ok(None);
    };
    let p = find(conn, user_id, pid)?.ok_or_else(|| LedgerError::not_found("Category", pid))?;
    if !p.is_group() {
        return Err(LedgerError::Conflict(format!(
            "'{}' is a sub-category and cannot hold categories",
            p.name
        )));
    }
    Ok(Some(pid))
}

/// Top-level grouping: a category without a parent.
pub fn create_grouping(ctx: &AppContext, name: &str) -> LedgerResult<Category> {
    create_category(ctx, name, ParentRef::None)
}

pub fn create_category(ctx: &AppContext, name: &str, parent: ParentRef) -> LedgerResult<Category> {
    let user_id = ctx.user_id()?;
    let name = validate::required(name, "Name")?;
    let conn = ctx.conn();
    let parent_id = check_parent(conn, user_id, parent)?;
    conn.execute(
        "INSERT INTO categories(user_id, name, parent_id) VALUES (?1, ?2, ?3)",
        params![user_id, &name, parent_id],
    )
    .op("Failed to create category.")?;
    Ok(Category {
        id: conn.last_insert_rowid(),
        name,
        parent_id,
    })
}

fn list_where(ctx: &AppContext, clause: &str, op: &'static str) -> LedgerResult<Vec<Category>> {
    let user_id = ctx.user_id()?;
    let sql = format!(
        "SELECT id, name, parent_id FROM categories WHERE user_id=?1{} ORDER BY name ASC, id ASC",
        clause
    );
    let mut stmt = ctx.conn().prepare(&sql).op(op)?;
    let rows = stmt.query_map(params![user_id], row_to_category).op(op)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().op(op)
}

pub fn list_groups(ctx: &AppContext) -> LedgerResult<Vec<Category>> {
    list_where(ctx, " AND parent_id IS NULL", "Failed to load groups.")
}

pub fn list_sub_categories(ctx: &AppContext) -> LedgerResult<Vec<Category>> {
    list_where(ctx, " AND parent_id IS NOT NULL", "Failed to load categories.")
}

pub fn list_categories_and_groups(ctx: &AppContext) -> LedgerResult<Vec<Category>> {
    list_where(ctx, "", "Failed to load categories.")
}

pub fn update_category(ctx: &AppContext, id: i64, upd: CategoryUpdate) -> LedgerResult<Category> {
    let user_id = ctx.user_id()?;
    let conn = ctx.conn();
    let mut cat = find(conn, user_id, id)?.ok_or_else(|| LedgerError::not_found("Category", id))?;
    if let Some(name) = upd.name {
        cat.name = validate::required(&name, "Name")?;
    }
    if let Some(parent) = upd.parent {
        if parent.id() == Some(id) {
            return Err(LedgerError::Conflict(
                "A category cannot be its own parent".into(),
            ));
        }
        let parent_id = check_parent(conn, user_id, parent)?;
        if parent_id.is_some() && has_children(conn, id)? {
            return Err(LedgerError::Conflict(format!(
                "'{}' has sub-categories and must stay a group",
                cat.name
            )));
        }
        cat.parent_id = parent_id;
    }
    conn.execute(
        "UPDATE categories SET name=?3, parent_id=?4 WHERE user_id=?1 AND id=?2",
        params![user_id, id, &cat.name, cat.parent_id],
    )
    .op("Failed to update category.")?;
    Ok(cat)
}

fn has_children(conn: &Connection, id: i64) -> LedgerResult<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE parent_id=?1)",
        params![id],
        |r| r.get(0),
    )
    .op("Failed to load category.")
}

/// Groups with sub-categories and categories used by transactions are kept.
pub fn delete_category(ctx: &AppContext, id: i64) -> LedgerResult<()> {
    let user_id = ctx.user_id()?;
    let conn = ctx.conn();
    let cat = find(conn, user_id, id)?.ok_or_else(|| LedgerError::not_found("Category", id))?;
    if has_children(conn, id)? {
        return Err(LedgerError::Conflict(format!(
            "'{}' still has sub-categories",
            cat.name
        )));
    }
    let refs: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id=?1 AND category_id=?2",
            params![user_id, id],
            |r| r.get(0),
        )
        .op("Failed to delete category.")?;
    if refs > 0 {
        return Err(LedgerError::Conflict(format!(
            "'{}' is referenced by {} transaction(s)",
            cat.name, refs
        )));
    }
    conn.execute(
        "DELETE FROM categories WHERE user_id=?1 AND id=?2",
        params![user_id, id],
    )
    .op("Failed to delete category.")?;
    Ok(())
}
