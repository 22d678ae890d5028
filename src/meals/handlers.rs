use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::Html,
    Form,
};
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::meals::store::MealRecord;
use crate::nutrition::Lookup;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LogMealForm {
    pub food: String,
}

pub async fn index() -> Html<&'static str> {
    Html(
        "<h1>Meal Logger</h1>\
         <p><a href=\"/log\">Log a meal</a> | <a href=\"/meals\">View meals</a></p>",
    )
}

pub async fn log_form() -> Html<&'static str> {
    Html(
        "<h2>Log a Meal</h2>\
         <form method=\"post\" action=\"/log\">\
         <input type=\"text\" name=\"food\" placeholder=\"e.g. 1 apple\" required>\
         <button type=\"submit\">Log</button>\
         </form>\
         <p><a href=\"/\">Home</a></p>",
    )
}

#[instrument(skip(state, form))]
pub async fn log_meal(
    State(state): State<AppState>,
    Form(form): Form<LogMealForm>,
) -> Result<Html<String>, (StatusCode, String)> {
    let facts = match state.resolver.resolve(&form.food).await {
        Lookup::Found(facts) => facts,
        Lookup::NotFound => {
            info!(query = %form.food, "no nutrition match");
            return Ok(Html("No nutrition data found.".into()));
        }
        // Upstream failures surface to the user the same way as a miss.
        Lookup::Failed(detail) => {
            warn!(query = %form.food, detail, "nutrition lookup failed");
            return Ok(Html("No nutrition data found.".into()));
        }
    };

    let meal = MealRecord {
        name: facts.name,
        calories: facts.calories,
        protein: facts.protein,
        fat: facts.fat,
        carbs: facts.carbs,
        date: OffsetDateTime::now_utc(),
    };

    if let Err(e) = state.store.insert(&meal).await {
        error!(error = %e, meal = %meal.name, "insert meal failed");
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong.".into(),
        ));
    }

    Ok(Html(format!(
        "<h2>Meal Logged</h2>\
         <p><strong>{}</strong></p>\
         <ul>\
         <li>Calories: {}</li>\
         <li>Protein: {}g</li>\
         <li>Fat: {}g</li>\
         <li>Carbohydrates: {}g</li>\
         </ul>\
         <a href=\"/log\">Log another meal</a> | <a href=\"/\">Home</a>",
        meal.name, meal.calories, meal.protein, meal.fat, meal.carbs
    )))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, String)> {
    let meals = match state.store.list_all_descending().await {
        Ok(meals) => meals,
        Err(e) => {
            error!(error = %e, "list meals failed");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error retrieving meals.".into(),
            ));
        }
    };

    let mut page = String::from("<h1>Logged Meals</h1>");
    if meals.is_empty() {
        page.push_str("<p>No meals logged yet.</p>");
    } else {
        page.push_str("<ul>");
        for meal in &meals {
            let date = meal
                .date
                .format(&Rfc3339)
                .unwrap_or_else(|_| meal.date.to_string());
            page.push_str(&format!(
                "<li><strong>{}</strong> ({}): \
                 {} kcal, {}g protein, {}g fat, {}g carbs</li>",
                meal.name, date, meal.calories, meal.protein, meal.fat, meal.carbs
            ));
        }
        page.push_str("</ul>");
    }
    page.push_str(
        "<form method=\"post\" action=\"/clear\">\
         <button type=\"submit\">Clear all meals</button>\
         </form>\
         <p><a href=\"/log\">Log a meal</a> | <a href=\"/\">Home</a></p>",
    );
    Ok(Html(page))
}

#[instrument(skip(state))]
pub async fn clear_meals(
    State(state): State<AppState>,
) -> Result<(StatusCode, HeaderMap), (StatusCode, String)> {
    match state.store.clear_all().await {
        Ok(removed) => {
            info!(removed, "cleared meal history");
            let mut headers = HeaderMap::new();
            headers.insert(header::LOCATION, header::HeaderValue::from_static("/meals"));
            Ok((StatusCode::FOUND, headers))
        }
        Err(e) => {
            error!(error = %e, "clear meals failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not clear meals.".into(),
            ))
        }
    }
}

/// Connectivity probe reporting how many meals are stored.
#[instrument(skip(state))]
pub async fn test_db(State(state): State<AppState>) -> Result<String, (StatusCode, String)> {
    match state.store.list_all_descending().await {
        Ok(meals) => Ok(format!(
            "Database connected - you have {} meal(s) logged.",
            meals.len()
        )),
        Err(e) => {
            error!(error = %e, "test-db probe failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not read from the database.".into(),
            ))
        }
    }
}
