//! Behavior 권한 - 타입이 있는 JSON 설정값
//!
//! 예: `{"article":{"maxPerDay":100}}`. 각 행동은 시작 시 선언되며, 선언된
//! 값 타입으로 디코드하고 여러 역할의 값을 타입별 규칙으로 합친다.
//!
//! ```ignore
//! #[derive(Default, Clone, Serialize, Deserialize)]
//! struct ArticleLimit { max_per_day: u32 }
//!
//! impl Combine for ArticleLimit {
//!     fn combine(&self, source: &Self) -> Self {
//!         Self { max_per_day: self.max_per_day.max(source.max_per_day) }
//!     }
//! }
//!
//! builder.register_behavior(Behavior::combinable::<ArticleLimit>("article", "Article limit"))?;
//! ```

use nging_foundation::{Error, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// 디코드된 값 (타입은 선언에 따라 다르다)
pub type BehaviorValue = Arc<dyn Any + Send + Sync>;

type Decoder = Arc<dyn Fn(&Value) -> Result<(BehaviorValue, Value)> + Send + Sync>;
type Combiner = Arc<dyn Fn(BehaviorValue, BehaviorValue) -> Option<Value> + Send + Sync>;

// ============================================================================
// ValueType
// ============================================================================

/// 선언된 값 타입
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Number,
    Int,
    Int32,
    Int64,
    Uint,
    Uint32,
    Uint64,
    Float,
    Float32,
    Float64,
    Bool,
    #[default]
    String,
    List,
    Json,
    Slice,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Number => "number",
            ValueType::Int => "int",
            ValueType::Int32 => "int32",
            ValueType::Int64 => "int64",
            ValueType::Uint => "uint",
            ValueType::Uint32 => "uint32",
            ValueType::Uint64 => "uint64",
            ValueType::Float => "float",
            ValueType::Float32 => "float32",
            ValueType::Float64 => "float64",
            ValueType::Bool => "bool",
            ValueType::String => "string",
            ValueType::List => "list",
            ValueType::Json => "json",
            ValueType::Slice => "slice",
        }
    }

    /// 역할마다 새 인스턴스가 필요한 참조형 값인지
    pub fn is_reference(&self) -> bool {
        matches!(self, ValueType::Json)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Combine
// ============================================================================

/// 여러 역할의 같은 행동 값을 합치는 규칙 (max, min, sum 등)
pub trait Combine {
    fn combine(&self, source: &Self) -> Self;
}

// ============================================================================
// Behavior (선언)
// ============================================================================

/// 행동 선언
#[derive(Clone)]
pub struct Behavior {
    pub name: String,
    pub title: String,
    pub description: String,
    pub value_type: ValueType,
    /// 기본값 (폼 표시와 초기값)
    pub value: Value,
    initor: Option<Decoder>,
    combiner: Option<Combiner>,
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("value_type", &self.value_type)
            .field("value", &self.value)
            .field("has_initor", &self.initor.is_some())
            .field("has_combine", &self.combiner.is_some())
            .finish()
    }
}

impl Behavior {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: String::new(),
            value_type: ValueType::default(),
            value: Value::Null,
            initor: None,
            combiner: None,
        }
    }

    /// JSON 타입 `T`로 디코드하는 선언
    pub fn typed<T>(name: impl Into<String>, title: impl Into<String>) -> Self
    where
        T: Default + Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        Self::new(name, title)
            .value_type(ValueType::Json)
            .value(T::default())
            .value_initor(T::default)
    }

    /// `typed`에 `Combine` 규칙을 더한 선언
    pub fn combinable<T>(name: impl Into<String>, title: impl Into<String>) -> Self
    where
        T: Combine + Default + Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let mut behavior = Self::typed::<T>(name, title);
        behavior.combiner = Some(Arc::new(|acc: BehaviorValue, src: BehaviorValue| {
            let acc = acc.downcast::<T>().ok()?;
            let src = src.downcast::<T>().ok()?;
            serde_json::to_value(acc.combine(&src)).ok()
        }));
        behavior
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// 기본값 지정
    pub fn value<T: Serialize>(mut self, value: T) -> Self {
        self.value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!("Behavior {}: cannot encode default value: {}", self.name, e);
                Value::Null
            }
        };
        self
    }

    /// 디코드할 때마다 새 인스턴스를 만드는 팩토리.
    /// 팩토리 값 위에 저장된 필드를 덮어쓴 뒤 `T`로 디코드한다.
    pub fn value_initor<T, F>(mut self, initor: F) -> Self
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.initor = Some(Arc::new(move |raw: &Value| -> Result<(BehaviorValue, Value)> {
            let base = serde_json::to_value(initor())?;
            let typed: T = serde_json::from_value(overlay(base, raw))?;
            let normalized = serde_json::to_value(&typed)?;
            Ok((Arc::new(typed) as BehaviorValue, normalized))
        }));
        self
    }

    /// JSON 기본값을 팩토리로 쓰는 선언 (파일로 선언할 때)
    pub fn value_initor_json(mut self, default: Value) -> Self {
        self.value = default.clone();
        self.initor = Some(Arc::new(move |raw: &Value| -> Result<(BehaviorValue, Value)> {
            let merged = overlay(default.clone(), raw);
            Ok((Arc::new(merged.clone()) as BehaviorValue, merged))
        }));
        self
    }

    /// 등록 전 검사
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Registration("behavior name is empty".into()));
        }
        if self.value_type.is_reference() && self.initor.is_none() {
            return Err(Error::Registration(format!(
                "behavior {}: {} values need a value initor",
                self.name, self.value_type
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Decode / Combine
    // ========================================================================

    /// 저장된 JSON 값을 새 인스턴스로 디코드
    pub fn decode(&self, raw: &Value) -> Result<BehaviorValue> {
        self.decode_normalized(raw).map(|(value, _)| value)
    }

    fn decode_normalized(&self, raw: &Value) -> Result<(BehaviorValue, Value)> {
        match &self.initor {
            Some(initor) => initor(raw),
            None => decode_builtin(self.value_type, raw).map(|v| (v, raw.clone())),
        }
    }

    /// 누적값과 다음 역할의 값을 합친다
    ///
    /// 다음 값이 디코드되지 않으면 누적값을 유지하고, 누적값이 깨져 있으면
    /// 다음 값으로 바꾼다. 둘 다 유효할 때만 `combine` 훅 또는 기본 병합을 쓴다.
    pub fn combine(&self, acc: &Value, src: &Value) -> Value {
        let incoming = match self.decode(src) {
            Ok(value) => value,
            Err(e) => {
                warn!("Behavior {}: keeping previous value, {}", self.name, e);
                return acc.clone();
            }
        };
        let current = match self.decode(acc) {
            Ok(value) => value,
            Err(e) => {
                warn!("Behavior {}: replacing undecodable value, {}", self.name, e);
                return src.clone();
            }
        };

        if let Some(combiner) = &self.combiner {
            if let Some(merged) = combiner(current, incoming) {
                return merged;
            }
            warn!("Behavior {}: combine produced no value", self.name);
        }
        merge_values(acc, src)
    }
}

/// 기본 병합: 둘 다 객체면 필드 단위 덮어쓰기, 아니면 나중 값
pub fn merge_values(acc: &Value, src: &Value) -> Value {
    match (acc, src) {
        (Value::Object(a), Value::Object(b)) => {
            let mut merged = a.clone();
            for (k, v) in b {
                merged.insert(k.clone(), v.clone());
            }
            Value::Object(merged)
        }
        _ => src.clone(),
    }
}

fn overlay(base: Value, raw: &Value) -> Value {
    match base {
        Value::Object(_) if raw.is_object() => merge_values(&base, raw),
        _ => raw.clone(),
    }
}

fn decode_builtin(value_type: ValueType, raw: &Value) -> Result<BehaviorValue> {
    let fail = || Error::Decode(format!("expected {} value, got {}", value_type, raw));
    let value: BehaviorValue = match value_type {
        ValueType::Number | ValueType::Float | ValueType::Float64 => {
            Arc::new(as_f64(raw).ok_or_else(fail)?)
        }
        ValueType::Float32 => Arc::new(as_f64(raw).ok_or_else(fail)? as f32),
        ValueType::Int | ValueType::Int64 => Arc::new(as_i64(raw).ok_or_else(fail)?),
        ValueType::Int32 => Arc::new(
            as_i64(raw)
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(fail)?,
        ),
        ValueType::Uint | ValueType::Uint64 => Arc::new(as_u64(raw).ok_or_else(fail)?),
        ValueType::Uint32 => Arc::new(
            as_u64(raw)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(fail)?,
        ),
        ValueType::Bool => Arc::new(as_bool(raw).ok_or_else(fail)?),
        ValueType::String => match raw {
            Value::String(s) => Arc::new(s.clone()),
            Value::Number(n) => Arc::new(n.to_string()),
            Value::Bool(b) => Arc::new(b.to_string()),
            _ => return Err(fail()),
        },
        ValueType::List => match raw {
            Value::String(s) => Arc::new(
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>(),
            ),
            Value::Array(_) => Arc::new(string_array(raw).ok_or_else(fail)?),
            _ => return Err(fail()),
        },
        ValueType::Slice => Arc::new(string_array(raw).ok_or_else(fail)?),
        ValueType::Json => Arc::new(raw.clone()),
    };
    Ok(value)
}

fn as_f64(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_i64(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_u64(raw: &Value) -> Option<u64> {
    match raw {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_bool(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::String(s) => parse_bool(s),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" | "y" => Some(true),
        "0" | "false" | "off" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn string_array(raw: &Value) -> Option<Vec<String>> {
    raw.as_array()?
        .iter()
        .map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Behaviors (선언 모음)
// ============================================================================

/// 이름 -> 선언 (이름 순 정렬)
#[derive(Debug, Clone, Default)]
pub struct Behaviors {
    items: BTreeMap<String, Behavior>,
}

impl Behaviors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 선언 등록. 검증 실패나 중복 이름이면 에러.
    pub fn register(&mut self, behavior: Behavior) -> Result<()> {
        behavior.validate()?;
        if self.items.contains_key(&behavior.name) {
            return Err(Error::Registration(format!(
                "behavior {} is already registered",
                behavior.name
            )));
        }
        debug!(
            "Registered behavior {} ({})",
            behavior.name, behavior.value_type
        );
        self.items.insert(behavior.name.clone(), behavior);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Behavior> {
        self.items.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Behavior> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// behaviors.json 한 항목 (파일로 선언)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorDecl {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default)]
    pub value: Value,
}

impl From<BehaviorDecl> for Behavior {
    fn from(decl: BehaviorDecl) -> Self {
        let behavior = Behavior::new(decl.name, decl.title)
            .description(decl.description)
            .value_type(decl.value_type);
        if decl.value_type.is_reference() {
            let default = if decl.value.is_null() {
                Value::Object(Map::new())
            } else {
                decl.value
            };
            behavior.value_initor_json(default)
        } else {
            behavior.value(decl.value)
        }
    }
}

// ============================================================================
// BehaviorPerms (파싱 결과)
// ============================================================================

/// 디코드된 한 행동 값
#[derive(Clone)]
pub struct BehaviorPerm {
    /// 저장 형태 (정규화된 JSON)
    pub raw: Value,
    pub value: BehaviorValue,
}

impl fmt::Debug for BehaviorPerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorPerm").field("raw", &self.raw).finish()
    }
}

/// 이름 -> 디코드된 값
#[derive(Debug, Clone, Default)]
pub struct BehaviorPerms {
    values: HashMap<String, BehaviorPerm>,
}

impl BehaviorPerms {
    pub fn get(&self, name: &str) -> Option<&BehaviorPerm> {
        self.values.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 선언이 없거나 값이 없으면 빈 결과
    pub fn check_behavior(&self, name: &str) -> CheckedBehavior {
        match self.values.get(name) {
            Some(perm) => CheckedBehavior {
                name: name.to_string(),
                raw: Some(perm.raw.clone()),
                value: Some(Arc::clone(&perm.value)),
            },
            None => CheckedBehavior::empty(name),
        }
    }
}

/// JSON 객체 문자열을 선언에 따라 디코드한다 (ParseBehavior)
///
/// 선언되지 않은 키는 조용히 버린다. 개별 값의 디코드 실패는 로그만 남기고
/// 그 키를 건너뛴다. 문자열 자체가 JSON 객체가 아니면 에러.
pub fn parse_behavior(perm_json: &str, behaviors: &Behaviors) -> Result<BehaviorPerms> {
    let mut perms = BehaviorPerms::default();
    let perm_json = perm_json.trim();
    if perm_json.is_empty() {
        return Ok(perms);
    }

    let object: Map<String, Value> = serde_json::from_str(perm_json)
        .map_err(|e| Error::Decode(format!("behavior permission is not a JSON object: {}", e)))?;

    for (name, raw) in object {
        let Some(behavior) = behaviors.get(&name) else {
            debug!("Ignoring undeclared behavior {}", name);
            continue;
        };
        match behavior.decode_normalized(&raw) {
            Ok((value, raw)) => {
                perms.values.insert(name, BehaviorPerm { raw, value });
            }
            Err(e) => warn!("Behavior {}: {}", name, e),
        }
    }
    Ok(perms)
}

/// 폼 값(이름 -> 값 목록)을 저장용 JSON 문자열로 바꾼다 (SerializeBehaviorValues)
///
/// 값이 하나도 없으면 빈 문자열.
pub fn serialize_behavior_values(
    form_values: &HashMap<String, Vec<String>>,
    behaviors: &Behaviors,
) -> String {
    let mut object = Map::new();
    for behavior in behaviors.iter() {
        let Some(values) = form_values.get(&behavior.name) else {
            continue;
        };
        match encode_form_value(behavior, values) {
            Ok(Some(value)) => {
                object.insert(behavior.name.clone(), value);
            }
            Ok(None) => {}
            Err(e) => warn!("Behavior {}: {}", behavior.name, e),
        }
    }
    if object.is_empty() {
        String::new()
    } else {
        Value::Object(object).to_string()
    }
}

fn encode_form_value(behavior: &Behavior, values: &[String]) -> Result<Option<Value>> {
    let Some(first) = values.iter().map(|s| s.trim()).find(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let parse_err = |e: &dyn fmt::Display| Error::Decode(format!("{:?}: {}", first, e));

    let value = match behavior.value_type {
        ValueType::List => Value::String(
            values
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(","),
        ),
        ValueType::Number | ValueType::Float | ValueType::Float64 => {
            let n: f64 = first.parse().map_err(|e| parse_err(&e))?;
            Value::Number(Number::from_f64(n).ok_or_else(|| parse_err(&"not finite"))?)
        }
        ValueType::Float32 => {
            let n: f32 = first.parse().map_err(|e| parse_err(&e))?;
            Value::Number(Number::from_f64(n as f64).ok_or_else(|| parse_err(&"not finite"))?)
        }
        ValueType::Int | ValueType::Int64 => {
            Value::from(first.parse::<i64>().map_err(|e| parse_err(&e))?)
        }
        ValueType::Int32 => Value::from(first.parse::<i32>().map_err(|e| parse_err(&e))?),
        ValueType::Uint | ValueType::Uint64 => {
            Value::from(first.parse::<u64>().map_err(|e| parse_err(&e))?)
        }
        ValueType::Uint32 => Value::from(first.parse::<u32>().map_err(|e| parse_err(&e))?),
        ValueType::Bool => Value::Bool(parse_bool(first).ok_or_else(|| parse_err(&"not a bool"))?),
        ValueType::Json => {
            let raw: Value = serde_json::from_str(first).map_err(|e| parse_err(&e))?;
            let (_, normalized) = behavior.decode_normalized(&raw)?;
            normalized
        }
        ValueType::Slice => Value::Array(
            values
                .iter()
                .map(|s| Value::String(s.clone()))
                .collect(),
        ),
        ValueType::String => Value::String(first.to_string()),
    };
    Ok(Some(value))
}

// ============================================================================
// CheckedBehavior
// ============================================================================

/// `check_behavior` 결과. 값이 없으면 `is_valid() == false`.
#[derive(Clone, Default)]
pub struct CheckedBehavior {
    name: String,
    raw: Option<Value>,
    value: Option<BehaviorValue>,
}

impl CheckedBehavior {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    /// 저장 형태 JSON
    pub fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    /// 선언된 타입으로 꺼낸다. 타입이 다르면 None.
    pub fn value<T: Any>(&self) -> Option<&T> {
        self.value.as_deref()?.downcast_ref::<T>()
    }
}

impl fmt::Debug for CheckedBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckedBehavior")
            .field("name", &self.name)
            .field("raw", &self.raw)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ArticleLimit {
        max_per_day: u32,
        #[serde(default)]
        need_review: bool,
    }

    impl Combine for ArticleLimit {
        fn combine(&self, source: &Self) -> Self {
            Self {
                max_per_day: self.max_per_day.max(source.max_per_day),
                need_review: self.need_review && source.need_review,
            }
        }
    }

    fn behaviors() -> Behaviors {
        let mut b = Behaviors::new();
        b.register(Behavior::combinable::<ArticleLimit>("article", "Article"))
            .unwrap();
        b.register(Behavior::new("quota", "Quota").value_type(ValueType::Uint32))
            .unwrap();
        b.register(Behavior::new("tags", "Tags").value_type(ValueType::List))
            .unwrap();
        b.register(Behavior::new("ratio", "Ratio").value_type(ValueType::Float64))
            .unwrap();
        b.register(Behavior::new("motd", "Message"))
            .unwrap();
        b
    }

    #[test]
    fn test_json_requires_initor() {
        let err = Behavior::new("raw", "Raw")
            .value_type(ValueType::Json)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Registration(_)));

        let mut b = Behaviors::new();
        assert!(b.register(Behavior::typed::<ArticleLimit>("a", "A")).is_ok());
        assert!(b.register(Behavior::typed::<ArticleLimit>("a", "A")).is_err());
    }

    #[test]
    fn test_parse_behavior_typed() {
        let perms = parse_behavior(
            r#"{"article":{"maxPerDay":5},"quota":"12","tags":"a, b","unknown":1}"#,
            &behaviors(),
        )
        .unwrap();

        assert_eq!(perms.len(), 3);
        let article = perms.check_behavior("article");
        assert!(article.is_valid());
        assert_eq!(
            article.value::<ArticleLimit>(),
            Some(&ArticleLimit {
                max_per_day: 5,
                need_review: false
            })
        );
        assert_eq!(article.raw(), Some(&json!({"maxPerDay": 5, "needReview": false})));
        assert_eq!(perms.check_behavior("quota").value::<u32>(), Some(&12));
        assert_eq!(
            perms.check_behavior("tags").value::<Vec<String>>(),
            Some(&vec!["a".to_string(), "b".to_string()])
        );
        assert!(!perms.check_behavior("unknown").is_valid());
        // 타입이 다르면 None
        assert!(perms.check_behavior("quota").value::<String>().is_none());
    }

    #[test]
    fn test_parse_behavior_bad_values() {
        let perms = parse_behavior(r#"{"quota":-3,"ratio":0.5}"#, &behaviors()).unwrap();
        assert!(!perms.check_behavior("quota").is_valid());
        assert_eq!(perms.check_behavior("ratio").value::<f64>(), Some(&0.5));

        assert!(parse_behavior("not json", &behaviors()).is_err());
        assert!(parse_behavior("[1,2]", &behaviors()).is_err());
        assert!(parse_behavior("", &behaviors()).unwrap().is_empty());
    }

    #[test]
    fn test_initor_gives_fresh_instances() {
        let b = Behavior::typed::<ArticleLimit>("article", "Article");
        let first = b.decode(&json!({"maxPerDay": 1})).unwrap();
        let second = b.decode(&json!({})).unwrap();
        assert_eq!(first.downcast_ref::<ArticleLimit>().unwrap().max_per_day, 1);
        assert_eq!(second.downcast_ref::<ArticleLimit>().unwrap().max_per_day, 0);
    }

    #[test]
    fn test_combine_uses_hook() {
        let b = behaviors();
        let article = b.get("article").unwrap();
        let merged = article.combine(
            &json!({"maxPerDay": 10, "needReview": true}),
            &json!({"maxPerDay": 3, "needReview": false}),
        );
        assert_eq!(merged, json!({"maxPerDay": 10, "needReview": false}));
    }

    #[test]
    fn test_combine_keeps_valid_value_over_garbage() {
        let b = behaviors();
        let article = b.get("article").unwrap();
        let good = json!({"maxPerDay": 9});
        assert_eq!(article.combine(&good, &json!("garbage")), good);
        assert_eq!(article.combine(&json!("garbage"), &good), good);

        let quota = b.get("quota").unwrap();
        assert_eq!(quota.combine(&json!(3), &json!("x")), json!(3));
        assert_eq!(quota.combine(&json!(3), &json!(-1)), json!(3));
    }

    #[test]
    fn test_combine_default_rules() {
        let quota = behaviors().get("quota").cloned().unwrap();
        assert_eq!(quota.combine(&json!(5), &json!(3)), json!(3));

        let merged = merge_values(&json!({"a": 1, "b": 2}), &json!({"b": 3, "c": 4}));
        assert_eq!(merged, json!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn test_serialize_behavior_values() {
        let mut form = HashMap::new();
        form.insert("quota".to_string(), vec!["42".to_string()]);
        form.insert("tags".to_string(), vec!["x".into(), " ".into(), "y".into()]);
        form.insert("article".to_string(), vec![r#"{"maxPerDay":7}"#.to_string()]);
        form.insert("ratio".to_string(), vec!["abc".to_string()]);
        form.insert("motd".to_string(), vec!["".into(), "hello".into()]);

        let json: Value = serde_json::from_str(&serialize_behavior_values(&form, &behaviors())).unwrap();
        assert_eq!(
            json,
            json!({
                "article": {"maxPerDay": 7, "needReview": false},
                "motd": "hello",
                "quota": 42,
                "tags": "x,y"
            })
        );

        assert_eq!(serialize_behavior_values(&HashMap::new(), &behaviors()), "");
    }

    #[test]
    fn test_behavior_spec_from_file() {
        let decl: BehaviorDecl = serde_json::from_value(json!({
            "name": "upload",
            "title": "Upload",
            "valueType": "json",
            "value": {"maxSize": 10, "exts": ["png"]}
        }))
        .unwrap();
        let behavior = Behavior::from(decl);
        assert!(behavior.validate().is_ok());

        let decoded = behavior.decode(&json!({"maxSize": 20})).unwrap();
        assert_eq!(
            decoded.downcast_ref::<Value>(),
            Some(&json!({"maxSize": 20, "exts": ["png"]}))
        );
    }
}
