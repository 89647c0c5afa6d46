//! Filter - 권한으로 메뉴 트리 거르기

use super::map::PermMap;
use nging_foundation::{join_path, NavigateList};
use std::sync::Arc;

/// 전체 경로 하나를 허용하는지 답하는 대상
pub trait Checker {
    fn check(&self, perm_path: &str) -> bool;
}

impl<F> Checker for F
where
    F: Fn(&str) -> bool,
{
    fn check(&self, perm_path: &str) -> bool {
        self(perm_path)
    }
}

impl Checker for PermMap {
    fn check(&self, perm_path: &str) -> bool {
        PermMap::check(self, perm_path)
    }
}

/// 메뉴 필터
///
/// 입력 목록은 바꾸지 않는다. 자식이 그대로인 서브트리는 원본 `Arc`를
/// 공유하고, 자식이 바뀐 노드만 새로 만든다.
pub struct Filter<'a, C: Checker + ?Sized> {
    checker: &'a C,
}

impl<'a, C: Checker + ?Sized> Filter<'a, C> {
    pub fn new(checker: &'a C) -> Self {
        Self { checker }
    }

    pub fn filter_navigate(&self, nav_list: &NavigateList) -> NavigateList {
        self.filter_list(nav_list, "", false)
    }

    fn filter_list(
        &self,
        list: &NavigateList,
        parent_path: &str,
        parent_unlimited: bool,
    ) -> NavigateList {
        let mut out = Vec::with_capacity(list.len());

        for item in list {
            let path = join_path(parent_path, &item.action);

            let children = match &item.children {
                Some(children) if !children.is_empty() => children,
                _ => {
                    // 말단: 부모나 자신이 unlimited 이거나 검사 통과
                    if parent_unlimited || item.unlimited || self.checker.check(&path) {
                        out.push(Arc::clone(item));
                    }
                    continue;
                }
            };

            let filtered = self.filter_list(children, &path, item.unlimited);
            if filtered.is_empty() && !item.unlimited && !self.checker.check(&path) {
                continue;
            }

            let unchanged = filtered.len() == children.len()
                && filtered
                    .iter()
                    .zip(children.iter())
                    .all(|(a, b)| Arc::ptr_eq(a, b));
            if unchanged {
                out.push(Arc::clone(item));
            } else {
                out.push(Arc::new(item.with_children(filtered)));
            }
        }

        NavigateList::from(out)
    }
}
