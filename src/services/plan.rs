//! Budget plan service
//!
//! Spending plans cap expenses over a window; savings goals track
//! contributions toward a target. Spending plans tied to a category must
//! reference an existing expense category.

use chrono::NaiveDate;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::transaction::normalize_comment;
use crate::models::{BudgetPlan, CategoryKind, Money, PlanId, PlanKind};
use crate::storage::{Storage, StoreKey};

use super::category::CategoryService;

/// Input for a new plan
#[derive(Debug, Clone)]
pub struct CreatePlanInput {
    pub name: String,
    pub kind: PlanKind,
    pub category: Option<String>,
    pub target: Money,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePlanInput {
    pub name: Option<String>,
    /// `Some(None)` widens a spending plan to all expenses
    pub category: Option<Option<String>>,
    pub target: Option<Money>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub comment: Option<Option<String>>,
}

/// Service for budget plans and savings goals
pub struct PlanService<'a> {
    storage: &'a Storage,
}

impl<'a> PlanService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn canonical_category(&self, category: Option<String>) -> BudgetResult<Option<String>> {
        match category.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => Ok(Some(
                CategoryService::new(self.storage)
                    .resolve(CategoryKind::Expense, name)?
                    .name,
            )),
        }
    }

    pub fn create(&self, input: CreatePlanInput) -> BudgetResult<BudgetPlan> {
        if input.target.is_zero() {
            return Err(BudgetError::Validation(
                "Plan target must be greater than zero".into(),
            ));
        }

        let mut plan = BudgetPlan::new(input.name.trim(), input.kind, input.target, input.start, input.end);
        plan.comment = normalize_comment(input.comment);
        // Validate the category tie before resolving so a savings goal with a
        // category reports the right error
        plan.category = input.category.clone();
        plan.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        plan.category = self.canonical_category(input.category)?;

        self.storage.plans.upsert(plan.clone())?;
        self.storage.save(StoreKey::Plans)?;

        self.storage.log_create(
            EntityType::Plan,
            plan.id.to_string(),
            Some(plan.name.clone()),
            &plan,
        )?;
        info!(id = %plan.id, kind = %plan.kind, target = %plan.target, "plan created");

        Ok(plan)
    }

    pub fn get(&self, id: PlanId) -> BudgetResult<Option<BudgetPlan>> {
        self.storage.plans.get(id)
    }

    pub fn find(&self, identifier: &str) -> BudgetResult<BudgetPlan> {
        self.storage
            .plans
            .find(identifier)?
            .ok_or_else(|| BudgetError::plan_not_found(identifier))
    }

    /// Plans ordered by start date, optionally of one kind
    pub fn list(&self, kind: Option<PlanKind>) -> BudgetResult<Vec<BudgetPlan>> {
        self.storage
            .plans
            .filter(|p| kind.map_or(true, |k| p.kind == k))
    }

    pub fn update(&self, id: PlanId, input: UpdatePlanInput) -> BudgetResult<BudgetPlan> {
        let before = self
            .get(id)?
            .ok_or_else(|| BudgetError::plan_not_found(id.to_string()))?;
        let mut plan = before.clone();

        if let Some(name) = input.name {
            plan.name = name.trim().to_string();
        }
        if let Some(target) = input.target {
            plan.target = target.abs();
        }
        if let Some(start) = input.start {
            plan.start = start;
        }
        if let Some(end) = input.end {
            plan.end = end;
        }
        if let Some(comment) = input.comment {
            plan.comment = normalize_comment(comment);
        }
        if let Some(category) = &input.category {
            plan.category = category.clone();
        }

        plan.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        // A stored category may have been deleted since; only a new one is resolved
        if let Some(category) = input.category {
            plan.category = self.canonical_category(category)?;
        }
        plan.updated_at = chrono::Utc::now();

        self.save_update(&before, &plan)?;
        Ok(plan)
    }

    /// Add to a savings goal; a negative amount withdraws, flooring at zero
    pub fn contribute(&self, id: PlanId, amount: Money) -> BudgetResult<BudgetPlan> {
        if amount.is_zero() {
            return Err(BudgetError::Validation("Contribution cannot be zero".into()));
        }

        let before = self
            .get(id)?
            .ok_or_else(|| BudgetError::plan_not_found(id.to_string()))?;
        if before.kind != PlanKind::Savings {
            return Err(BudgetError::Validation(format!(
                "'{}' is a spending plan; only savings goals take contributions",
                before.name
            )));
        }

        let mut plan = before.clone();
        plan.contribute(amount);

        self.save_update(&before, &plan)?;
        if plan.is_reached() && !before.is_reached() {
            info!(id = %plan.id, "savings goal reached");
        }
        Ok(plan)
    }

    pub fn delete(&self, id: PlanId) -> BudgetResult<BudgetPlan> {
        let plan = self
            .storage
            .plans
            .delete(id)?
            .ok_or_else(|| BudgetError::plan_not_found(id.to_string()))?;
        self.storage.save(StoreKey::Plans)?;

        self.storage.log_delete(
            EntityType::Plan,
            id.to_string(),
            Some(plan.name.clone()),
            &plan,
        )?;

        Ok(plan)
    }

    fn save_update(&self, before: &BudgetPlan, after: &BudgetPlan) -> BudgetResult<()> {
        self.storage.plans.upsert(after.clone())?;
        self.storage.save(StoreKey::Plans)?;

        self.storage.log_update(
            EntityType::Plan,
            after.id.to_string(),
            Some(after.name.clone()),
            before,
            after,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        initialize_storage(&storage).unwrap();
        (temp_dir, storage)
    }

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn spending(category: Option<&str>) -> CreatePlanInput {
        CreatePlanInput {
            name: "Groceries".into(),
            kind: PlanKind::Spending,
            category: category.map(String::from),
            target: Money::from_cents(40000),
            start: d(3, 1),
            end: d(3, 31),
            comment: None,
        }
    }

    fn savings() -> CreatePlanInput {
        CreatePlanInput {
            name: "Holiday".into(),
            kind: PlanKind::Savings,
            category: None,
            target: Money::from_cents(100000),
            start: d(1, 1),
            end: d(12, 31),
            comment: None,
        }
    }

    #[test]
    fn test_create_resolves_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlanService::new(&storage);

        let plan = service.create(spending(Some("food"))).unwrap();
        assert_eq!(plan.category.as_deref(), Some("Food"));

        assert!(service.create(spending(Some("Yachts"))).unwrap_err().is_not_found());
        assert!(service.create(spending(Some("Salary"))).unwrap_err().is_not_found());
    }

    #[test]
    fn test_savings_goal_rejects_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlanService::new(&storage);

        let mut input = savings();
        input.category = Some("Food".into());
        assert!(service.create(input).unwrap_err().is_validation());
    }

    #[test]
    fn test_contribute_and_withdraw() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlanService::new(&storage);
        let goal = service.create(savings()).unwrap();

        let plan = service.contribute(goal.id, Money::from_cents(60000)).unwrap();
        assert_eq!(plan.saved.cents(), 60000);

        let plan = service.contribute(goal.id, Money::from_cents(50000)).unwrap();
        assert!(plan.is_reached());

        let plan = service.contribute(goal.id, Money::from_cents(-200000)).unwrap();
        assert_eq!(plan.saved, Money::zero());

        assert!(service.contribute(goal.id, Money::zero()).unwrap_err().is_validation());
    }

    #[test]
    fn test_contribute_to_spending_plan_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlanService::new(&storage);
        let plan = service.create(spending(None)).unwrap();

        assert!(service
            .contribute(plan.id, Money::from_cents(100))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_update_survives_deleted_category() {
        let (_temp_dir, storage) = create_test_storage();
        let categories = CategoryService::new(&storage);
        categories.add(CategoryKind::Expense, "Pets").unwrap();

        let service = PlanService::new(&storage);
        let plan = service.create(spending(Some("pets"))).unwrap();
        categories.delete(CategoryKind::Expense, "Pets").unwrap();

        let renamed = service
            .update(
                plan.id,
                UpdatePlanInput {
                    name: Some("Vet bills".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.name, "Vet bills");
        assert_eq!(renamed.category.as_deref(), Some("Pets"));

        // Pointing the plan at a missing category is still rejected
        let err = service
            .update(
                plan.id,
                UpdatePlanInput {
                    category: Some(Some("Pets".into())),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_update_list_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlanService::new(&storage);
        let plan = service.create(spending(Some("Food"))).unwrap();
        service.create(savings()).unwrap();

        let widened = service
            .update(
                plan.id,
                UpdatePlanInput {
                    category: Some(None),
                    end: Some(d(4, 30)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(widened.category.is_none());
        assert_eq!(widened.end, d(4, 30));

        let bad = service.update(
            plan.id,
            UpdatePlanInput {
                end: Some(d(2, 1)),
                ..Default::default()
            },
        );
        assert!(bad.unwrap_err().is_validation());

        assert_eq!(service.list(None).unwrap().len(), 2);
        assert_eq!(service.list(Some(PlanKind::Savings)).unwrap()[0].name, "Holiday");

        service.delete(plan.id).unwrap();
        assert_eq!(service.list(None).unwrap().len(), 1);
    }
}
