use yew::prelude::*;

use crate::models::{FavoriteEntry, ProductSnapshot};
use crate::state::AppContext;

pub struct UseFavoritesHandle {
    pub items: UseStateHandle<Vec<FavoriteEntry>>,
    pub toggle: Callback<ProductSnapshot>,
    pub remove: Callback<String>,
    pub clear: Callback<()>,
}

impl UseFavoritesHandle {
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_favorite(&self, product_id: &str) -> bool {
        self.items.iter().any(|e| e.product_id == product_id)
    }
}

#[hook]
pub fn use_favorites(context: AppContext) -> UseFavoritesHandle {
    let items = {
        let favorites = context.favorites.clone();
        use_state(move || favorites.items())
    };

    {
        let items = items.clone();
        let favorites = context.favorites.clone();
        use_effect_with((), move |_| {
            let subscription = favorites.subscribe(move |state| items.set(state.items.clone()));
            move || drop(subscription)
        });
    }

    let toggle = {
        let favorites = context.favorites.clone();
        Callback::from(move |product: ProductSnapshot| {
            if let Err(errors) = favorites.toggle(&product) {
                log::warn!("⚠️ Favorito rechazado: {}", errors);
            }
        })
    };

    let remove = {
        let favorites = context.favorites.clone();
        Callback::from(move |product_id: String| {
            favorites.remove(&product_id);
        })
    };

    let clear = {
        let favorites = context.favorites.clone();
        Callback::from(move |_| favorites.clear())
    };

    UseFavoritesHandle {
        items,
        toggle,
        remove,
        clear,
    }
}
