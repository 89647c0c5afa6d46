//! 서브커맨드 구현

use crate::workspace::Workspace;
use anyhow::Result;
use nging_core::{build_perm_actions, generate_permission, FormValues};
use nging_foundation::{Error, NavigateList, PermissionKind};

/// 경로마다 allow/deny 출력. 하나라도 거부되면 false.
pub fn check(workspace: &Workspace, user: &str, paths: &[String]) -> Result<bool> {
    let perm = workspace.permission(user)?;
    let mut all = true;
    for path in paths {
        let allowed = perm.check(path);
        all &= allowed;
        println!("{:<6} {}", verdict(allowed), path);
    }
    Ok(all)
}

pub fn check_cmd(workspace: &Workspace, user: &str, cmds: &[String]) -> Result<bool> {
    let perm = workspace.permission(user)?;
    let mut all = true;
    for cmd in cmds {
        let allowed = perm.check_cmd(cmd);
        all &= allowed;
        println!("{:<6} {}", verdict(allowed), cmd);
    }
    Ok(all)
}

pub fn behavior(workspace: &Workspace, user: &str, name: &str) -> Result<bool> {
    let perm = workspace.permission(user)?;
    let checked = perm.check_behavior(name);
    match checked.raw() {
        Some(raw) => {
            println!("{}", serde_json::to_string_pretty(raw)?);
            Ok(true)
        }
        None => {
            println!("(no value for {})", name);
            Ok(false)
        }
    }
}

/// 메뉴 출력. 사용자가 있으면 권한으로 거른다.
pub fn menu(
    workspace: &Workspace,
    user: Option<&str>,
    source: Option<&str>,
    show_hidden: bool,
) -> Result<()> {
    for (name, list) in workspace.registry.all_navigates() {
        if source.is_some_and(|s| s != name) {
            continue;
        }
        let mut list = match user {
            Some(user) => workspace.permission(user)?.filter_navigate(list),
            None => list.clone(),
        };
        if !show_hidden {
            list = list.menu_only();
        }
        println!("[{}]", name);
        print_tree(&list, 1);
    }
    Ok(())
}

fn print_tree(list: &NavigateList, depth: usize) {
    for item in list {
        let mut marks = String::new();
        if item.unlimited {
            marks.push_str(" [unlimited]");
        }
        if !item.display_on_menu {
            marks.push_str(" [hidden]");
        }
        println!("{}- {} ({}){}", "  ".repeat(depth), item.name, item.action, marks);
        if let Some(children) = &item.children {
            print_tree(children, depth + 1);
        }
    }
}

/// 모든 전체 경로 (메뉴 목록, 프로젝트 순)
pub fn paths(workspace: &Workspace, source: Option<&str>) {
    let registry = &workspace.registry;
    for (name, list) in registry.all_navigates() {
        if source.is_none() || source == Some(name) {
            for path in list.full_path("") {
                println!("{}", path);
            }
        }
    }
    for project in registry.projects() {
        if source.is_none() || source == Some(project.ident.as_str()) {
            for path in project.nav_list.full_path("") {
                println!("{}", path);
            }
        }
    }
}

pub fn build(values: &[String]) {
    println!("{}", build_perm_actions(values));
}

/// `field=value` 목록을 폼 값으로 모아 저장용 문자열 생성
pub fn generate(workspace: &Workspace, kind: &str, fields: &[String]) -> Result<()> {
    let kind: PermissionKind = kind.parse()?;
    let form = parse_fields(fields)?;
    println!("{}", generate_permission(kind, &form, &workspace.registry));
    Ok(())
}

fn parse_fields(fields: &[String]) -> Result<FormValues> {
    let mut form = FormValues::new();
    for field in fields {
        let (key, value) = field
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| Error::InvalidInput(format!("expected field=value, got {:?}", field)))?;
        form.entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }
    Ok(form)
}

pub fn project(workspace: &Workspace, url: &str) -> bool {
    match workspace.registry.project_ident_by_url(url) {
        Some(ident) => {
            println!("{}", ident);
            true
        }
        None => {
            println!("(no project for {})", url);
            false
        }
    }
}

fn verdict(allowed: bool) -> &'static str {
    if allowed {
        "allow"
    } else {
        "deny"
    }
}
