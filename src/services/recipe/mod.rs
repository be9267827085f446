// レシピ機能
// 準備ステージで1注文ごとに実行される作業単位

pub mod breakfast;
pub mod implementations;

// 公開API
pub use breakfast::{BreakfastMenu, BreakfastRecipe, OverlappedPlan, RecipeStep, SideTask};
pub use implementations::{FaultInjectingRecipe, InjectedFault, InstantRecipe};
