use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A whole non-negative number from any JSON number, rounded. Anything else,
/// including negatives, reads as `None`.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite() && *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n.round() as u32))
}

/// Sort key from any JSON number, rounded; missing or non-numeric reads as 0.
fn lenient_order<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .map(|n| n.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32)
        .unwrap_or_default())
}

/// Trimmed value of an optional string, or `None` when it is blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// -- Session --

/// Basic identity returned alongside a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBasic {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl UserBasic {
    pub fn display_name(&self) -> String {
        display_name(self.name.as_deref(), &self.email)
    }
}

/// Name when set, otherwise the local part of the email address.
pub fn display_name(name: Option<&str>, email: &str) -> String {
    match non_blank(name) {
        Some(name) => name.to_string(),
        None => email.split('@').next().unwrap_or(email).to_string(),
    }
}

/// A live session. Token and identity always travel together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserBasic,
}

// -- Profile --

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, deserialize_with = "lenient_count")]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub interests: Vec<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub id: String,
    pub url: String,
    #[serde(default, deserialize_with = "lenient_order")]
    pub order: i32,
}

impl Photo {
    /// The photo with the lowest `order`, used as avatar and hero image.
    pub fn primary(photos: &[Photo]) -> Option<&Photo> {
        photos.iter().min_by_key(|p| p.order)
    }
}

/// The authenticated user's full record (`GET /users/me`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Me {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile: Profile,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photos: Vec<Photo>,
}

impl Me {
    pub fn primary_photo(&self) -> Option<&Photo> {
        Photo::primary(&self.photos)
    }

    pub fn display_name(&self) -> String {
        display_name(self.name.as_deref(), &self.email)
    }
}

// -- Discovery --

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    #[serde(default, deserialize_with = "lenient_count")]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub height_cm: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub interests: Vec<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub photos: Option<Vec<Photo>>,
}

/// Another user's public profile as shown in the discovery feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile: CandidateProfile,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photos: Vec<Photo>,
}

impl Candidate {
    /// Profile-level photos win over the top-level list when present.
    pub fn photos(&self) -> &[Photo] {
        match &self.profile.photos {
            Some(photos) if !photos.is_empty() => photos,
            _ => &self.photos,
        }
    }

    pub fn hero_photo(&self) -> Option<&Photo> {
        Photo::primary(self.photos())
    }

    pub fn display_name(&self) -> String {
        display_name(self.name.as_deref(), &self.email)
    }
}

// -- Sections --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardItem {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub label: Option<String>,
    pub url: String,
}

/// Typed body of a profile section. Unknown or malformed shapes fall back to
/// `Unsupported`, which renders as a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    Text { body: String },
    Gallery { images: Vec<String> },
    Card { items: Vec<CardItem> },
    Links { links: Vec<Link> },
    Unsupported { kind: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawSection")]
pub struct Section {
    pub id: String,
    pub title: String,
    pub order: i32,
    pub content: SectionContent,
}

#[derive(Deserialize)]
struct RawSection {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    content: Value,
    #[serde(default, deserialize_with = "lenient_order")]
    order: i32,
}

#[derive(Deserialize)]
struct TextBody {
    #[serde(default)]
    body: Option<String>,
}

#[derive(Deserialize)]
struct GalleryBody {
    #[serde(default, deserialize_with = "null_as_default")]
    images: Vec<String>,
}

#[derive(Deserialize)]
struct CardBody {
    #[serde(default, deserialize_with = "null_as_default")]
    items: Vec<CardItem>,
}

#[derive(Deserialize)]
struct LinksBody {
    #[serde(default, deserialize_with = "null_as_default")]
    links: Vec<Link>,
}

impl SectionContent {
    fn parse(kind: &str, content: Value) -> Self {
        let content = if content.is_null() {
            Value::Object(Default::default())
        } else {
            content
        };
        let parsed = match kind {
            "text" => serde_json::from_value::<TextBody>(content).map(|b| Self::Text {
                body: b.body.unwrap_or_default(),
            }),
            "gallery" => serde_json::from_value::<GalleryBody>(content)
                .map(|b| Self::Gallery { images: b.images }),
            "card" => {
                serde_json::from_value::<CardBody>(content).map(|b| Self::Card { items: b.items })
            }
            "links" => {
                serde_json::from_value::<LinksBody>(content).map(|b| Self::Links { links: b.links })
            }
            _ => {
                return Self::Unsupported {
                    kind: kind.to_string(),
                };
            }
        };
        parsed.unwrap_or_else(|_| Self::Unsupported {
            kind: kind.to_string(),
        })
    }
}

impl From<RawSection> for Section {
    fn from(raw: RawSection) -> Self {
        Self {
            content: SectionContent::parse(&raw.kind, raw.content),
            id: raw.id,
            title: raw.title,
            order: raw.order,
        }
    }
}

// -- Matches & chat --

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterpartProfile {
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counterpart {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile: CounterpartProfile,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photos: Vec<Photo>,
}

impl Counterpart {
    pub fn display_name(&self) -> String {
        display_name(self.name.as_deref(), &self.email)
    }

    pub fn avatar(&self) -> Option<&Photo> {
        Photo::primary(&self.photos)
    }
}

/// A mutual-like pairing. Created server-side, only displayed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_a_id: String,
    #[serde(default)]
    pub user_b_id: String,
    #[serde(default)]
    pub counterpart: Option<Counterpart>,
    /// Most recent first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub sender_id: String,
}
