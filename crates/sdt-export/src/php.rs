//! PHP rendition of the profile generator.
//!
//! The script body mirrors `sdt_gen::generate_respondent`: attribute order
//! is resolved once, each profile is redrawn until it matches no
//! restriction, and the run aborts with a JSON error once `$max_attempts`
//! draws of a single profile were rejected.

use std::fmt::Write;

use sdt_gen::{GenerationPlan, GeneratorConfig};

use crate::literal::{decimal, php_array, php_string};

const HEADER: &str = r#"<?php
// Conjoint profile generator.
// Prints a JSON object with one entry per placeholder:
//   F-[task]-[attribute position]           attribute name
//   F-[task]-[profile]-[attribute position] level shown in that profile
"#;

const WEIGHTED_RANDOMIZE: &str = r#"
// Returns a 1-based level index drawn from the attribute's weights.
function weighted_randomize($prob_array, $at_key)
{
    $prob_list = $prob_array[$at_key];
    $unif_rand = mt_rand() / (mt_getrandmax() + 1);
    $cumulative = 0.0;
    $last_positive = 0;
    for ($i = 0; $i < count($prob_list); $i++) {
        $cumulative = $cumulative + $prob_list[$i];
        if ($prob_list[$i] > 0) {
            $last_positive = $i + 1;
        }
        if ($unif_rand < $cumulative) {
            return $i + 1;
        }
    }
    return $last_positive > 0 ? $last_positive : count($prob_list);
}
"#;

const RESOLVE_ORDER: &str = r#"
// Attribute order, shared by every task of this respondent.
$featureArrayKeys = array_map('strval', array_keys($featurearray));
if ($randomize == 1) {
    $trailing = array();
    foreach ($attrconstraintarray as $block) {
        for ($m = 1; $m < count($block); $m++) {
            $trailing[] = $block[$m];
        }
    }
    $free = array();
    foreach ($featureArrayKeys as $key) {
        if (!in_array($key, $trailing, true)) {
            $free[] = $key;
        }
    }
    shuffle($free);
    $featureArrayKeys = array();
    foreach ($free as $key) {
        $placed = array($key);
        foreach ($attrconstraintarray as $block) {
            if ($block[0] === $key) {
                $placed = $block;
                break;
            }
        }
        foreach ($placed as $member) {
            $featureArrayKeys[] = $member;
        }
    }
}
"#;

const GENERATE: &str = r#"
$returnarray = array();
for ($p = 1; $p <= $K; $p++) {
    for ($i = 1; $i <= $N; $i++) {
        $attempts = 0;
        $complete = false;
        while (!$complete) {
            if ($attempts >= $max_attempts) {
                http_response_code(500);
                header('Content-Type: application/json');
                print json_encode(array(
                    'error' => 'restrictions-unsatisfiable',
                    'task' => $p,
                    'profile' => $i,
                    'attempts' => $attempts,
                ));
                exit;
            }
            $attempts = $attempts + 1;

            $profile_dict = array();
            foreach ($featureArrayKeys as $attribute) {
                $levels = $featurearray[$attribute];
                if ($weighted == 1) {
                    $level_index = weighted_randomize($probabilityarray, $attribute) - 1;
                } else {
                    $level_index = mt_rand(1, count($levels)) - 1;
                }
                $profile_dict[$attribute] = $levels[$level_index];
            }

            $complete = true;
            foreach ($restrictionarray as $restriction) {
                $matched = true;
                foreach ($restriction as $pair) {
                    if ($profile_dict[$pair[0]] !== $pair[1]) {
                        $matched = false;
                        break;
                    }
                }
                if ($matched) {
                    $complete = false;
                    break;
                }
            }
        }

        $attr = 0;
        foreach ($featureArrayKeys as $attribute) {
            $attr = $attr + 1;
            $returnarray['F-' . $p . '-' . $attr] = $attribute;
            $returnarray['F-' . $p . '-' . $i . '-' . $attr] = $profile_dict[$attribute];
        }
    }
}

header('Content-Type: application/json');
print json_encode($returnarray);
?>
"#;

fn feature_array(plan: &GenerationPlan) -> String {
    php_array(plan.attributes.iter().map(|attribute| {
        format!(
            "{} => {}",
            php_string(&attribute.name),
            php_array(attribute.levels.iter().map(|level| php_string(level)))
        )
    }))
}

fn probability_array(plan: &GenerationPlan) -> String {
    php_array(plan.attributes.iter().map(|attribute| {
        format!(
            "{} => {}",
            php_string(&attribute.name),
            php_array(attribute.probabilities.iter().map(|&p| decimal(p)))
        )
    }))
}

fn restriction_array(plan: &GenerationPlan) -> String {
    php_array(plan.restrictions.iter().map(|restriction| {
        php_array(restriction.iter().map(|(attribute, level)| {
            php_array([php_string(attribute), php_string(level)])
        }))
    }))
}

fn constraint_array(plan: &GenerationPlan) -> String {
    php_array(
        plan.constraints
            .iter()
            .map(|block| php_array(block.iter().map(|member| php_string(member)))),
    )
}

/// Renders the complete PHP script for `plan`.
///
/// Output depends only on its inputs, so repeated exports are
/// byte-identical.
pub fn render_php(plan: &GenerationPlan, config: &GeneratorConfig) -> String {
    let mut out = String::from(HEADER);
    // Writing into a String cannot fail.
    let _ = writeln!(out);
    let _ = writeln!(out, "$featurearray = {};", feature_array(plan));
    let _ = writeln!(out, "$restrictionarray = {};", restriction_array(plan));
    let _ = writeln!(out, "$probabilityarray = {};", probability_array(plan));
    let _ = writeln!(out, "$attrconstraintarray = {};", constraint_array(plan));
    let _ = writeln!(out);
    let _ = writeln!(out, "$weighted = {};", u8::from(plan.weighted));
    let _ = writeln!(out, "$randomize = {};", u8::from(plan.randomize_order));
    let _ = writeln!(out, "// K tasks per respondent, N profiles per task");
    let _ = writeln!(out, "$K = {};", plan.tasks);
    let _ = writeln!(out, "$N = {};", plan.profiles);
    let _ = writeln!(out, "$max_attempts = {};", config.max_attempts);
    out.push_str(WEIGHTED_RANDOMIZE);
    out.push_str(RESOLVE_ORDER);
    out.push_str(GENERATE);
    out
}
