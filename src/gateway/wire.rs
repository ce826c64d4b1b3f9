/// Wire format of the spreadsheet script API and the image host
///
/// Request bodies are built and responses decoded here, away from the HTTP
/// client, so every protocol rule can be checked without a network.
use serde::{Deserialize, Serialize};

use super::WriteAck;
use crate::error::GatewayError;
use crate::gallery::model::Photo;
use crate::recipes::model::{Recipe, RecipeDraft};

const SUCCESS: &str = "success";
const ERROR: &str = "error";

/// Common response envelope: `{ status, message?, ... }`
#[derive(Deserialize, Debug)]
struct Envelope<T> {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    payload: T,
}

#[derive(Deserialize, Debug)]
struct RecipeListing {
    #[serde(default)]
    recipes: Vec<Recipe>,
}

#[derive(Deserialize, Debug)]
struct PhotoListing {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Deserialize, Debug)]
struct PasswordCheck {
    #[serde(default)]
    valid: bool,
}

/// Envelope with no payload of interest
#[derive(Deserialize, Debug)]
struct Bare {}

#[derive(Deserialize, Debug)]
struct UploadReply {
    secure_url: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
enum RecipeAction {
    CreateRecipe,
    EditRecipe,
    DeleteRecipe,
}

#[derive(Serialize, Debug)]
struct RecipeWrite<'a> {
    action: RecipeAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(flatten)]
    draft: Option<&'a RecipeDraft>,
}

#[derive(Serialize, Debug)]
struct PhotoWrite<'a> {
    action: &'static str,
    url: &'a str,
}

fn require_success<T>(envelope: Envelope<T>) -> Result<T, GatewayError> {
    match envelope.status.as_deref() {
        Some(SUCCESS) => Ok(envelope.payload),
        _ => Err(GatewayError::Protocol(
            envelope
                .message
                .unwrap_or_else(|| "unknown error".to_string()),
        )),
    }
}

/// `{ status: "success", recipes: [...] }`
pub fn decode_recipes(body: &str) -> Result<Vec<Recipe>, GatewayError> {
    let envelope: Envelope<RecipeListing> = serde_json::from_str(body)?;
    Ok(require_success(envelope)?.recipes)
}

/// `{ photos: [...] }`; a missing list means no photos yet
pub fn decode_photos(body: &str) -> Result<Vec<Photo>, GatewayError> {
    let listing: PhotoListing = serde_json::from_str(body)?;
    Ok(listing.photos)
}

/// `{ status: "success", valid: bool }`
pub fn decode_password_check(body: &str) -> Result<bool, GatewayError> {
    let envelope: Envelope<PasswordCheck> = serde_json::from_str(body)?;
    Ok(require_success(envelope)?.valid)
}

/// `{ secure_url }` from the image host
pub fn decode_upload(body: &str) -> Result<String, GatewayError> {
    let reply: UploadReply = serde_json::from_str(body)?;
    reply
        .secure_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| GatewayError::Protocol("upload reply has no secure_url".to_string()))
}

/// Interpret the body of a write.
///
/// The script endpoint often answers writes with a redirect page or an
/// empty body; that is not a failure, only an unconfirmed write. An explicit
/// `status: "error"` is.
pub fn decode_write_ack(body: &str) -> Result<WriteAck, GatewayError> {
    if body.trim().is_empty() {
        return Ok(WriteAck::Unconfirmed);
    }

    let Ok(envelope) = serde_json::from_str::<Envelope<Bare>>(body) else {
        return Ok(WriteAck::Unconfirmed);
    };

    match envelope.status.as_deref() {
        Some(SUCCESS) => Ok(WriteAck::Confirmed),
        Some(ERROR) => Err(GatewayError::Protocol(
            envelope
                .message
                .unwrap_or_else(|| "write rejected".to_string()),
        )),
        _ => Ok(WriteAck::Unconfirmed),
    }
}

pub fn create_recipe_body(draft: &RecipeDraft) -> Result<String, GatewayError> {
    Ok(serde_json::to_string(&RecipeWrite {
        action: RecipeAction::CreateRecipe,
        id: None,
        draft: Some(draft),
    })?)
}

pub fn update_recipe_body(id: &str, draft: &RecipeDraft) -> Result<String, GatewayError> {
    Ok(serde_json::to_string(&RecipeWrite {
        action: RecipeAction::EditRecipe,
        id: Some(id),
        draft: Some(draft),
    })?)
}

pub fn delete_recipe_body(id: &str) -> Result<String, GatewayError> {
    Ok(serde_json::to_string(&RecipeWrite {
        action: RecipeAction::DeleteRecipe,
        id: Some(id),
        draft: None,
    })?)
}

pub fn add_photo_body(url: &str) -> Result<String, GatewayError> {
    Ok(serde_json::to_string(&PhotoWrite { action: "add", url })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::model::Category;
    use serde_json::{json, Value};

    fn draft() -> RecipeDraft {
        RecipeDraft {
            name: "Concha".into(),
            category: Category::PanDulce,
            ingredients: "Harina\nAzúcar".into(),
            instructions: "Hornear".into(),
        }
    }

    #[test]
    fn test_decode_recipes_success() {
        let body = r#"{"status":"success","recipes":[
            {"id":"a1","name":"Bolillo","category":"Pan Blanco","ingredients":"Harina","instructions":"Amasar"}
        ]}"#;
        let recipes = decode_recipes(body).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "Bolillo");
    }

    #[test]
    fn test_decode_recipes_tolerates_row_without_category() {
        let body = r#"{"status":"success","recipes":[
            {"id":1,"name":"Pan suelto","ingredients":"Harina","instructions":"Amasar"},
            {"id":2,"name":"Bolillo","category":"Pan Blanco","ingredients":"Harina","instructions":"Amasar"}
        ]}"#;
        let recipes = decode_recipes(body).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].category, Category::Otros);
    }

    #[test]
    fn test_decode_recipes_requires_success_marker() {
        let err = decode_recipes(r#"{"status":"error","message":"Hoja no encontrada"}"#).unwrap_err();
        assert!(matches!(err, GatewayError::Protocol(ref m) if m == "Hoja no encontrada"));

        let err = decode_recipes(r#"{"recipes":[]}"#).unwrap_err();
        assert!(matches!(err, GatewayError::Protocol(ref m) if m == "unknown error"));

        let err = decode_recipes("<!DOCTYPE html>").unwrap_err();
        assert!(matches!(err, GatewayError::Protocol(_)));
    }

    #[test]
    fn test_decode_photos_defaults_to_empty() {
        assert!(decode_photos("{}").unwrap().is_empty());

        let photos = decode_photos(r#"{"photos":[{"url":"https://x/upload/a.jpg"}]}"#).unwrap();
        assert_eq!(photos, vec![Photo::new("https://x/upload/a.jpg")]);
    }

    #[test]
    fn test_decode_password_check() {
        assert!(decode_password_check(r#"{"status":"success","valid":true}"#).unwrap());
        assert!(!decode_password_check(r#"{"status":"success","valid":false}"#).unwrap());
        assert!(!decode_password_check(r#"{"status":"success"}"#).unwrap());
        assert!(decode_password_check(r#"{"status":"error"}"#).is_err());
    }

    #[test]
    fn test_decode_write_ack() {
        assert_eq!(decode_write_ack("").unwrap(), WriteAck::Unconfirmed);
        assert_eq!(decode_write_ack("<html>moved</html>").unwrap(), WriteAck::Unconfirmed);
        assert_eq!(
            decode_write_ack(r#"{"status":"success"}"#).unwrap(),
            WriteAck::Confirmed
        );
        assert!(decode_write_ack(r#"{"status":"error","message":"id inválido"}"#).is_err());
    }

    #[test]
    fn test_decode_upload() {
        let url = decode_upload(r#"{"secure_url":"https://res.cloudinary.com/x/image/upload/v1/a.jpg","bytes":123}"#)
            .unwrap();
        assert!(url.ends_with("a.jpg"));
        assert!(decode_upload(r#"{"error":{"message":"bad preset"}}"#).is_err());
    }

    #[test]
    fn test_write_bodies() {
        let create: Value = serde_json::from_str(&create_recipe_body(&draft()).unwrap()).unwrap();
        assert_eq!(
            create,
            json!({
                "action": "createRecipe",
                "name": "Concha",
                "category": "Pan Dulce",
                "ingredients": "Harina\nAzúcar",
                "instructions": "Hornear"
            })
        );

        let update: Value = serde_json::from_str(&update_recipe_body("r9", &draft()).unwrap()).unwrap();
        assert_eq!(update["action"], "editRecipe");
        assert_eq!(update["id"], "r9");
        assert_eq!(update["category"], "Pan Dulce");

        let delete: Value = serde_json::from_str(&delete_recipe_body("r9").unwrap()).unwrap();
        assert_eq!(delete, json!({ "action": "deleteRecipe", "id": "r9" }));

        let photo: Value = serde_json::from_str(&add_photo_body("https://x/a.jpg").unwrap()).unwrap();
        assert_eq!(photo, json!({ "action": "add", "url": "https://x/a.jpg" }));
    }
}
